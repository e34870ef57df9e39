use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::card::CardType;
use crate::error::CoupError;

/// A turn-defining move claimed by the acting player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Assassinate,
    Steal,
    Exchange,
}

impl ActionKind {
    // in the order they are offered to the acting player
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Income,
        ActionKind::ForeignAid,
        ActionKind::Exchange,
        ActionKind::Steal,
        ActionKind::Tax,
        ActionKind::Assassinate,
        ActionKind::Coup,
    ];

    pub fn cost(self) -> u8 {
        match self {
            ActionKind::Assassinate => 3,
            ActionKind::Coup => 7,
            _ => 0,
        }
    }

    pub fn is_targetable(self) -> bool {
        matches!(self, ActionKind::Assassinate | ActionKind::Coup | ActionKind::Steal)
    }

    pub fn is_challengeable(self) -> bool {
        matches!(
            self,
            ActionKind::Tax | ActionKind::Assassinate | ActionKind::Steal | ActionKind::Exchange
        )
    }

    /// The counteraction that blocks this action, if any.
    pub fn counter(self) -> Option<Counteraction> {
        match self {
            ActionKind::ForeignAid => Some(Counteraction::BlockForeignAid),
            ActionKind::Assassinate => Some(Counteraction::BlockAssassination),
            ActionKind::Steal => Some(Counteraction::BlockSteal),
            _ => None,
        }
    }

    pub fn is_counterable(self) -> bool {
        self.counter().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Income => "income",
            ActionKind::ForeignAid => "foreign-aid",
            ActionKind::Coup => "coup",
            ActionKind::Tax => "tax",
            ActionKind::Assassinate => "assassinate",
            ActionKind::Steal => "steal",
            ActionKind::Exchange => "exchange",
        }
    }
}

/// A claim by a non-acting player that blocks a specific action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Counteraction {
    BlockForeignAid,
    BlockAssassination,
    BlockSteal,
}

impl Counteraction {
    pub const ALL: [Counteraction; 3] = [
        Counteraction::BlockForeignAid,
        Counteraction::BlockAssassination,
        Counteraction::BlockSteal,
    ];

    pub fn blocks(self) -> ActionKind {
        match self {
            Counteraction::BlockForeignAid => ActionKind::ForeignAid,
            Counteraction::BlockAssassination => ActionKind::Assassinate,
            Counteraction::BlockSteal => ActionKind::Steal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Counteraction::BlockForeignAid => "block-foreign-aid",
            Counteraction::BlockAssassination => "block-assassination",
            Counteraction::BlockSteal => "block-steal",
        }
    }
}

/// Anything a player can be challenged on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Claim {
    Action(ActionKind),
    Counter(Counteraction),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Move {
    Action(ActionKind),
    Counter(Counteraction),
    Pass,
    Challenge,
    LoseInfluence,
    DiscardInfluence,
}

impl Move {
    pub fn needs_player_target(&self) -> bool {
        matches!(self, Move::Action(action) if action.is_targetable())
    }

    pub fn needs_card_target(&self) -> bool {
        matches!(self, Move::LoseInfluence | Move::DiscardInfluence)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Action(action) => f.write_str(action.as_str()),
            Move::Counter(counter) => f.write_str(counter.as_str()),
            Move::Pass => f.write_str("pass"),
            Move::Challenge => f.write_str("challenge"),
            Move::LoseInfluence => f.write_str("lose-influence"),
            Move::DiscardInfluence => f.write_str("discard-influence"),
        }
    }
}

impl FromStr for Move {
    type Err = CoupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(action) = ActionKind::ALL.iter().find(|action| action.as_str() == s) {
            return Ok(Move::Action(*action));
        }
        if let Some(counter) = Counteraction::ALL.iter().find(|counter| counter.as_str() == s) {
            return Ok(Move::Counter(*counter));
        }
        match s {
            "pass" => Ok(Move::Pass),
            "challenge" => Ok(Move::Challenge),
            "lose-influence" => Ok(Move::LoseInfluence),
            "discard-influence" => Ok(Move::DiscardInfluence),
            _ => Err(CoupError::BadPlayerMove(format!("unknown move {s:?}"))),
        }
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.to_string()
    }
}

impl TryFrom<String> for Move {
    type Error = CoupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What a move is aimed at: another player for targeted actions, one of the
/// mover's own cards for influence loss and exchange discards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Player(String),
    Card(CardType),
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Player(name) => f.write_str(name),
            Target::Card(card) => f.write_str(card.as_str()),
        }
    }
}

/// A move as it arrives from a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub player: String,
    #[serde(rename = "move")]
    pub mv: Move,
    pub target: Option<String>,
}
