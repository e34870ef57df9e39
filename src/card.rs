use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::action::{ActionKind, Claim, Counteraction};
use crate::error::CoupError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Duke,
    Captain,
    Assassin,
    Contessa,
    Ambassador,
}

pub static CHARACTER_VARIANTS: [CardType; 5] = [
    CardType::Duke,
    CardType::Captain,
    CardType::Assassin,
    CardType::Contessa,
    CardType::Ambassador,
];

impl CardType {
    /// The claims this character backs up when its holder is challenged.
    pub fn legitimizes(self) -> &'static [Claim] {
        match self {
            CardType::Duke => &[
                Claim::Action(ActionKind::Tax),
                Claim::Counter(Counteraction::BlockForeignAid),
            ],
            CardType::Captain => &[
                Claim::Action(ActionKind::Steal),
                Claim::Counter(Counteraction::BlockSteal),
            ],
            CardType::Assassin => &[
                Claim::Action(ActionKind::Assassinate),
            ],
            CardType::Contessa => &[
                Claim::Counter(Counteraction::BlockAssassination),
            ],
            CardType::Ambassador => &[
                Claim::Action(ActionKind::Exchange),
                Claim::Counter(Counteraction::BlockSteal),
            ],
        }
    }

    pub fn backs(self, claim: Claim) -> bool {
        self.legitimizes().contains(&claim)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Duke => "duke",
            CardType::Captain => "captain",
            CardType::Assassin => "assassin",
            CardType::Contessa => "contessa",
            CardType::Ambassador => "ambassador",
        }
    }
}

impl Display for CardType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = CoupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CHARACTER_VARIANTS
            .iter()
            .copied()
            .find(|card| card.as_str() == s)
            .ok_or_else(|| CoupError::BadPlayerMove(format!("unknown card {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{ActionKind, Claim, Counteraction};
    use crate::card::{CardType, CHARACTER_VARIANTS};

    #[test]
    fn block_steal_has_two_backers() {
        let backers: Vec<CardType> = CHARACTER_VARIANTS
            .iter()
            .copied()
            .filter(|card| card.backs(Claim::Counter(Counteraction::BlockSteal)))
            .collect();
        assert_eq!(backers, vec![CardType::Captain, CardType::Ambassador]);
    }

    #[test]
    fn unchallengeable_actions_have_no_backer() {
        for action in [ActionKind::Income, ActionKind::ForeignAid, ActionKind::Coup] {
            assert!(CHARACTER_VARIANTS.iter().all(|card| !card.backs(Claim::Action(action))));
        }
    }

    #[test]
    fn every_challengeable_claim_has_a_backer() {
        let claims = ActionKind::ALL
            .iter()
            .filter(|action| action.is_challengeable())
            .map(|&action| Claim::Action(action))
            .chain(Counteraction::ALL.iter().map(|&counter| Claim::Counter(counter)));

        for claim in claims {
            assert!(CHARACTER_VARIANTS.iter().any(|card| card.backs(claim)), "{claim:?}");
        }
    }

    #[test]
    fn names() {
        for card in CHARACTER_VARIANTS {
            assert_eq!(card.to_string().parse::<CardType>().unwrap(), card);
        }
        assert!("jester".parse::<CardType>().is_err());
        assert_eq!(serde_json::to_string(&CardType::Contessa).unwrap(), "\"contessa\"");
    }
}
