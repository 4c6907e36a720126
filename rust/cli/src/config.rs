//! Settings resolution: defaults, then an optional TOML file named by
//! `POKERROOM_CONFIG`, then environment overrides. Every value remembers where
//! it came from so `cfg` can report it.

use pokerroom_table::TableSettings;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "POKERROOM_CONFIG";
pub const SEED_ENV: &str = "POKERROOM_SEED";
pub const BOT_DELAY_ENV: &str = "POKERROOM_BOT_DELAY_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_chips: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub bot_count: usize,
    pub bot_delay_ms: u64,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let table = TableSettings::default();
        Self {
            starting_chips: table.starting_chips,
            small_blind: table.small_blind,
            big_blind: table.big_blind,
            bot_count: table.bot_count,
            bot_delay_ms: table.bot_delay_ms,
            seed: None,
        }
    }
}

impl Config {
    pub fn table_settings(&self) -> TableSettings {
        TableSettings {
            starting_chips: self.starting_chips,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            bot_count: self.bot_count,
            bot_delay_ms: self.bot_delay_ms,
            ..TableSettings::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    #[default]
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigSources {
    pub starting_chips: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub bot_count: ValueSource,
    pub bot_delay_ms: ValueSource,
    pub seed: ValueSource,
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Resolves settings reading variables through `env`.
pub fn load_from<F>(env: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(path) = env(CONFIG_ENV) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_chips {
            cfg.starting_chips = v;
            sources.starting_chips = ValueSource::File;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.bot_count {
            cfg.bot_count = v;
            sources.bot_count = ValueSource::File;
        }
        if let Some(v) = f.bot_delay_ms {
            cfg.bot_delay_ms = v;
            sources.bot_delay_ms = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }

    if let Some(seed) = env(SEED_ENV) {
        cfg.seed = Some(
            seed.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(delay) = env(BOT_DELAY_ENV) {
        cfg.bot_delay_ms = delay
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid bot delay: {}", delay)))?;
        sources.bot_delay_ms = ValueSource::Env;
    }

    cfg.table_settings()
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_chips: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    bot_count: Option<usize>,
    #[serde(default)]
    bot_delay_ms: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
}
