use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoupError {
    #[error("not enough players to start ({count}, need at least 2)")]
    NotEnoughPlayers { count: usize },

    #[error("game is full")]
    GameIsFull,

    #[error("seat {0} is already occupied")]
    SeatOccupied(usize),

    #[error("seat {0} does not exist")]
    InvalidSeat(usize),

    #[error("no player named {0:?} in this game")]
    UnknownPlayer(String),

    #[error("bad game state: {0}")]
    BadGameState(String),

    #[error("bad player move: {0}")]
    BadPlayerMove(String),

    // internal consistency fault, halts the room
    #[error("bad turn state: {0}")]
    BadTurnState(String),
}

impl CoupError {
    /// True when the error means the turn itself is corrupt rather than a
    /// player having asked for something illegal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoupError::BadTurnState(_))
    }
}

pub type Result<T> = std::result::Result<T, CoupError>;
