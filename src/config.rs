//! Per-room game settings.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Which cards the court deck is built from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckComposition {
    /// three of each of the five characters
    #[default]
    Standard,
    /// duke, captain, assassin, contessa and a second captain triple, no ambassadors
    Legacy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_coins: u8,
    pub deck: DeckComposition,
    /// fixed seed for deck shuffles, entropy when unset
    pub seed: Option<u64>,
    /// how long the room should wait on a player before playing their default move
    pub move_timeout: Option<Duration>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_coins: 0,
            deck: DeckComposition::Standard,
            seed: None,
            move_timeout: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_starting_coins(mut self, coins: u8) -> Self {
        self.starting_coins = coins;
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: DeckComposition) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn with_move_timeout(mut self, timeout: Duration) -> Self {
        self.move_timeout = Some(timeout);
        self
    }
}
