use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use crate::card::{CardType, CHARACTER_VARIANTS};
use crate::config::DeckComposition;

pub const COPIES_PER_CHARACTER: usize = 3;

/// The face down court deck. Card order is never observable from outside, it
/// gets reshuffled every time a card goes back in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<CardType>,
    rng: Pcg64,
}

impl Deck {
    pub fn new(composition: DeckComposition, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };

        let characters: Vec<CardType> = match composition {
            DeckComposition::Standard => CHARACTER_VARIANTS.to_vec(),
            DeckComposition::Legacy => vec![
                CardType::Duke,
                CardType::Captain,
                CardType::Assassin,
                CardType::Contessa,
                CardType::Captain,
            ],
        };

        let cards = characters
            .iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_CHARACTER))
            .collect();

        let mut deck = Self { cards, rng };
        deck.shuffle();
        deck
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    pub fn draw(&mut self) -> Option<CardType> {
        self.cards.pop()
    }

    pub fn return_and_reshuffle(&mut self, card: CardType) {
        self.cards.push(card);
        self.shuffle();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count(&self, card: CardType) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }
}

#[cfg(test)]
mod tests {
    use crate::card::{CardType, CHARACTER_VARIANTS};
    use crate::config::DeckComposition;
    use crate::deck::Deck;

    #[test]
    fn standard_composition() {
        let deck = Deck::new(DeckComposition::Standard, Some(1));
        assert_eq!(deck.len(), 15);
        for card in CHARACTER_VARIANTS {
            assert_eq!(deck.count(card), 3);
        }
    }

    #[test]
    fn legacy_composition_has_no_ambassador() {
        let deck = Deck::new(DeckComposition::Legacy, Some(1));
        assert_eq!(deck.len(), 15);
        assert_eq!(deck.count(CardType::Captain), 6);
        assert_eq!(deck.count(CardType::Ambassador), 0);
    }

    #[test]
    fn draw_until_empty() {
        let mut deck = Deck::new(DeckComposition::Standard, Some(2));
        for _ in 0..15 {
            assert!(deck.draw().is_some());
        }
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn return_grows_deck() {
        let mut deck = Deck::new(DeckComposition::Standard, Some(3));
        let card = deck.draw().unwrap();
        assert_eq!(deck.len(), 14);
        deck.return_and_reshuffle(card);
        assert_eq!(deck.len(), 15);
        assert_eq!(deck.count(card), 3);
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = Deck::new(DeckComposition::Standard, Some(42));
        let mut b = Deck::new(DeckComposition::Standard, Some(42));
        for _ in 0..15 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
