use pokerroom_engine::logger::DEFAULT_LOG_CAPACITY;
use pokerroom_engine::player::STARTING_CHIPS;
use pokerroom_engine::round::RoundConfig;
use pokerroom_engine::rules::{Blinds, BIG_BLIND, SMALL_BLIND};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BOT_DELAY_MS: u64 = 1_200;
pub const DEFAULT_BOT_COUNT: usize = 3;
pub const MAX_BOT_COUNT: usize = 5;
/// Largest stack for which a full table's chips still fit in a `u32`.
pub const MAX_STARTING_CHIPS: u32 = u32::MAX / (MAX_BOT_COUNT as u32 + 1);

/// Table settings applied to new practice sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableSettings {
    pub small_blind: u32,
    pub big_blind: u32,
    /// Chips every seat starts the game with
    pub starting_chips: u32,
    /// Pause before a computer seat acts
    pub bot_delay_ms: u64,
    /// Event log entries kept per round
    pub log_capacity: usize,
    /// Computer opponents at a practice table (1-5)
    pub bot_count: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            small_blind: SMALL_BLIND,
            big_blind: BIG_BLIND,
            starting_chips: STARTING_CHIPS,
            bot_delay_ms: DEFAULT_BOT_DELAY_MS,
            log_capacity: DEFAULT_LOG_CAPACITY,
            bot_count: DEFAULT_BOT_COUNT,
        }
    }
}

impl TableSettings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.small_blind == 0 {
            return Err(SettingsError::InvalidValue(
                "small_blind must be greater than 0".to_string(),
            ));
        }

        if self.big_blind <= self.small_blind {
            return Err(SettingsError::InvalidValue(
                "big_blind must be greater than small_blind".to_string(),
            ));
        }

        if self.starting_chips < self.big_blind {
            return Err(SettingsError::InvalidValue(
                "starting_chips must cover the big blind".to_string(),
            ));
        }

        if self.starting_chips > MAX_STARTING_CHIPS {
            return Err(SettingsError::InvalidValue(format!(
                "starting_chips must be at most {}",
                MAX_STARTING_CHIPS
            )));
        }

        if self.log_capacity == 0 {
            return Err(SettingsError::InvalidValue(
                "log_capacity must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_BOT_COUNT).contains(&self.bot_count) {
            return Err(SettingsError::InvalidValue(format!(
                "bot_count must be between 1 and {}",
                MAX_BOT_COUNT
            )));
        }

        Ok(())
    }

    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            blinds: Blinds {
                small: self.small_blind,
                big: self.big_blind,
            },
            log_capacity: self.log_capacity,
        }
    }

    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }
}

/// In-memory settings store with validation
#[derive(Debug)]
pub struct SettingsStore {
    settings: RwLock<TableSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(TableSettings::default()),
        }
    }

    pub fn with_settings(settings: TableSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> Result<TableSettings, SettingsError> {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsError::StoragePoisoned)
    }

    /// Replaces the settings; running sessions keep the values they started with
    pub fn update(&self, new_settings: TableSettings) -> Result<TableSettings, SettingsError> {
        new_settings.validate()?;

        let mut guard = self
            .settings
            .write()
            .map_err(|_| SettingsError::StoragePoisoned)?;
        *guard = new_settings.clone();
        Ok(new_settings)
    }

    pub fn reset(&self) -> Result<TableSettings, SettingsError> {
        self.update(TableSettings::default())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
    #[error("Settings storage poisoned")]
    StoragePoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = TableSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.bot_delay(), Duration::from_millis(1200));
        assert_eq!(settings.round_config(), RoundConfig::default());
    }

    #[test]
    fn validates_blind_order() {
        let settings = TableSettings {
            small_blind: 20,
            big_blind: 20,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = TableSettings {
            small_blind: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validates_bot_count_range() {
        for (count, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let settings = TableSettings {
                bot_count: count,
                ..Default::default()
            };
            assert_eq!(settings.validate().is_ok(), ok, "bot_count {}", count);
        }
    }

    #[test]
    fn starting_chips_are_bounded_for_a_full_table() {
        let at_limit = TableSettings {
            starting_chips: MAX_STARTING_CHIPS,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
        assert!(u64::from(MAX_STARTING_CHIPS) * (MAX_BOT_COUNT as u64 + 1) <= u64::from(u32::MAX));

        let over = TableSettings {
            starting_chips: MAX_STARTING_CHIPS + 1,
            ..Default::default()
        };
        assert!(over.validate().is_err());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let settings: TableSettings = serde_json::from_str(r#"{"bot_delay_ms": 0}"#).unwrap();
        assert_eq!(settings.bot_delay_ms, 0);
        assert_eq!(settings.big_blind, 20);
    }

    #[test]
    fn store_rejects_invalid_updates() {
        let store = SettingsStore::new();
        let bad = TableSettings {
            log_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            store.update(bad),
            Err(SettingsError::InvalidValue(_))
        ));
        assert_eq!(store.get().unwrap(), TableSettings::default());

        let fast = TableSettings {
            bot_delay_ms: 10,
            ..Default::default()
        };
        store.update(fast.clone()).unwrap();
        assert_eq!(store.get().unwrap(), fast);
        assert_eq!(store.reset().unwrap(), TableSettings::default());
    }
}
