use serde::{Deserialize, Serialize};
use crate::card::CardType;
use crate::deck::Deck;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerStatus {
    InGame,
    Eliminated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub(crate) name: String,
    pub(crate) coins: u8,
    pub(crate) influence: Vec<CardType>, // face down
    pub(crate) revealed: Vec<CardType>,  // face up, lost for good
    pub(crate) status: PlayerStatus,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coins: 0,
            influence: Vec::with_capacity(4),
            revealed: Vec::with_capacity(2),
            status: PlayerStatus::InGame,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coins(&self) -> u8 {
        self.coins
    }

    pub fn influence(&self) -> &[CardType] {
        &self.influence
    }

    pub fn revealed(&self) -> &[CardType] {
        &self.revealed
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_in_game(&self) -> bool {
        self.status == PlayerStatus::InGame
    }

    pub fn holds(&self, card: CardType) -> bool {
        self.influence.contains(&card)
    }

    pub(crate) fn reset(&mut self, coins: u8) {
        self.coins = coins;
        self.influence.clear();
        self.revealed.clear();
        self.status = PlayerStatus::InGame;
    }

    pub(crate) fn draw_from(&mut self, deck: &mut Deck) -> Option<CardType> {
        let card = deck.draw()?;
        self.influence.push(card);
        Some(card)
    }

    /// Flip a held card face up. Returns false if the card isn't held.
    pub(crate) fn lose_influence(&mut self, card: CardType) -> bool {
        match self.influence.iter().position(|&c| c == card) {
            None => false,
            Some(idx) => {
                self.revealed.push(self.influence.remove(idx));
                if self.influence.is_empty() {
                    self.status = PlayerStatus::Eliminated;
                }
                true
            }
        }
    }

    /// Put a held card back in the deck without revealing it.
    pub(crate) fn return_to_deck(&mut self, card: CardType, deck: &mut Deck) -> bool {
        match self.influence.iter().position(|&c| c == card) {
            None => false,
            Some(idx) => {
                deck.return_and_reshuffle(self.influence.remove(idx));
                true
            }
        }
    }

    /// Swap a proven card for a fresh one, the old card goes back in first.
    pub(crate) fn exchange_card(&mut self, card: CardType, deck: &mut Deck) -> bool {
        if !self.return_to_deck(card, deck) {
            return false;
        }
        self.draw_from(deck).is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::card::CardType::{Assassin, Duke};
    use crate::config::DeckComposition;
    use crate::deck::Deck;
    use crate::player::{Player, PlayerStatus};

    #[test]
    fn losing_last_card_eliminates() {
        let mut player = Player::new("p0");
        player.influence = vec![Duke, Assassin];

        assert!(player.lose_influence(Assassin));
        assert!(player.is_in_game());
        assert_eq!(player.revealed(), &[Assassin]);

        // can't lose what you don't hold
        assert!(!player.lose_influence(Assassin));

        assert!(player.lose_influence(Duke));
        assert_eq!(player.status(), PlayerStatus::Eliminated);
        assert!(player.influence().is_empty());
        assert_eq!(player.revealed(), &[Assassin, Duke]);
    }

    #[test]
    fn exchange_keeps_hand_size() {
        let mut deck = Deck::new(DeckComposition::Standard, Some(9));
        let mut player = Player::new("p0");
        player.draw_from(&mut deck);
        player.draw_from(&mut deck);
        assert_eq!(deck.len(), 13);

        let card = player.influence()[0];
        assert!(player.exchange_card(card, &mut deck));
        assert_eq!(player.influence().len(), 2);
        assert_eq!(deck.len(), 13);
        assert!(player.revealed().is_empty());
    }
}
