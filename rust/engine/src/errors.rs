use thiserror::Error;

/// Coarse classification of a [`GameError`], used by hosts to decide whether to
/// show a message, end the game, or resynchronize.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// Action submitted out of turn, or by a folded/all-in seat.
    IllegalTurn,
    /// Action submitted in turn but not legal in the current betting context.
    IllegalAction,
    /// Fewer than two seats hold chips; the round cannot be created.
    InsufficientPlayers,
    /// The state document is missing data or internally inconsistent.
    CorruptState,
    /// Malformed caller input (card text, card counts).
    InvalidInput,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: String, actual: String },
    #[error("Player {0} already folded")]
    PlayerAlreadyFolded(String),
    #[error("Player {0} is all-in and cannot act")]
    PlayerAllIn(String),
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Cannot check while owing {owed} chips")]
    CannotCheck { owed: u32 },
    #[error("Nothing to call, check instead")]
    NothingToCall,
    #[error("Raise to {amount} must exceed the current bet of {current_bet}")]
    RaiseTooSmall { amount: u32, current_bet: u32 },
    #[error("Insufficient chips: needs {needed}, has {available}")]
    InsufficientChips { needed: u32, available: u32 },
    #[error("Chip total of the seated players does not fit in a u32")]
    ChipOverflow,
    #[error("At least 2 players with chips are required, found {0}")]
    InsufficientPlayers(usize),
    #[error("Corrupt game state: {0}")]
    CorruptState(String),
    #[error("Expected 5 to 7 cards, got {0}")]
    InvalidCardCount(usize),
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotPlayersTurn { .. }
            | GameError::PlayerAlreadyFolded(_)
            | GameError::PlayerAllIn(_)
            | GameError::HandAlreadyComplete => ErrorKind::IllegalTurn,
            GameError::CannotCheck { .. }
            | GameError::NothingToCall
            | GameError::RaiseTooSmall { .. }
            | GameError::InsufficientChips { .. } => ErrorKind::IllegalAction,
            GameError::InsufficientPlayers(_) => ErrorKind::InsufficientPlayers,
            GameError::CorruptState(_) => ErrorKind::CorruptState,
            GameError::InvalidCardCount(_)
            | GameError::InvalidCard(_)
            | GameError::ChipOverflow => ErrorKind::InvalidInput,
        }
    }
}
