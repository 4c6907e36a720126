//! Practice-table host for the poker engine: sessions with computer
//! opponents, delayed bot turns, event fan-out, and a personal-best
//! leaderboard.

pub mod errors;
pub mod events;
pub mod leaderboard;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod settings;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{EventBus, EventSubscription, GameEvent, PlayerInfo};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardError};
pub use logging::{init_logging, init_test_logging, CapturedLog, LogFormat, TestLogSubscriber};
pub use scheduler::{BotScheduler, SchedulerError};
pub use session::{
    SessionConfig, SessionError, SessionId, SessionManager, SessionSnapshot, TableSession,
};
pub use settings::{SettingsError, SettingsStore, TableSettings};
