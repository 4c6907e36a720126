use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub type PlayerId = String;

/// Chips each player brings to a fresh table.
pub const STARTING_CHIPS: u32 = 1_000;

/// A betting action submitted by the acting seat.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Leave the hand.
    Fold,
    /// Pass; only legal when nothing is owed.
    Check,
    /// Match the current bet (capped at the remaining stack).
    Call,
    /// Raise the current bet *to* the given total for this phase.
    Raise(u32),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => f.write_str("fold"),
            PlayerAction::Check => f.write_str("check"),
            PlayerAction::Call => f.write_str("call"),
            PlayerAction::Raise(to) => write!(f, "raise to {}", to),
        }
    }
}

/// A participant at the table. Chips persist across hands within a session.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: String,
    pub chips: u32,
    pub is_bot: bool,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, display_name: impl Into<String>, chips: u32) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar: "😎".to_string(),
            chips,
            is_bot: false,
        }
    }

    pub fn bot(id: impl Into<PlayerId>, display_name: impl Into<String>, chips: u32) -> Self {
        Self {
            is_bot: true,
            avatar: "🤖".to_string(),
            ..Self::new(id, display_name, chips)
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    pub fn is_busted(&self) -> bool {
        self.chips == 0
    }
}

/// Short lowercase alphanumeric id, 8 characters.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> PlayerId {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    (0..8)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
