//! Error type shared by the command handlers. Every variant maps to exit code 2.

use crate::config::ConfigError;
use pokerroom_engine::errors::GameError;
use pokerroom_table::{SessionError, SettingsError};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Reading input or writing output failed
    Io(std::io::Error),

    /// Bad arguments or unparseable user input
    InvalidInput(String),

    Config(String),

    /// The engine rejected an operation
    Engine(GameError),

    /// The practice table failed
    Session(SessionError),

    /// A computer turn never arrived
    Stalled(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(e) => write!(f, "Engine error: {}", e),
            CliError::Session(e) => write!(f, "Table error: {}", e),
            CliError::Stalled(msg) => write!(f, "Table stalled: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::Session(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error)
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        CliError::Session(error)
    }
}

impl From<SettingsError> for CliError {
    fn from(error: SettingsError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_category() {
        let err = CliError::InvalidInput("hands must be >= 1".into());
        assert_eq!(err.to_string(), "Invalid input: hands must be >= 1");

        let err: CliError = GameError::InvalidCardCount(3).into();
        assert_eq!(err.to_string(), "Engine error: Expected 5 to 7 cards, got 3");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn session_errors_keep_their_message() {
        let err: CliError = SessionError::RoundInProgress.into();
        assert!(err.to_string().contains("still in progress"));
    }
}
