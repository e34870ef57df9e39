pub mod action;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod game;
pub mod history;
pub mod legality;
pub mod player;
pub mod rules;
pub mod turn;
pub mod view;

pub use action::{ActionKind, Claim, Counteraction, Move, Submission, Target};
pub use card::CardType;
pub use config::{DeckComposition, GameConfig};
pub use error::{CoupError, Result};
pub use game::Game;
pub use history::{MoveLog, MoveRecord};
pub use player::{Player, PlayerStatus};
pub use turn::{Phase, Turn};
pub use view::{CardFace, GameView, PlayerView, SeatView};
