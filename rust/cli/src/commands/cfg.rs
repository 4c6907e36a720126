//! `cfg`: prints the resolved settings as JSON, each value with its source.
//!
//! ```json
//! {
//!   "bot_delay_ms": { "value": 1200, "source": "default" },
//!   "seed": { "value": 42, "source": "env" }
//! }
//! ```

use crate::config::{self, ConfigResolved};
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &e.to_string())?;
            return Err(e.into());
        }
    };
    write_resolved(&resolved, out)
}

fn write_resolved(resolved: &ConfigResolved, out: &mut dyn Write) -> Result<(), CliError> {
    let ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "starting_chips": { "value": config.starting_chips, "source": sources.starting_chips },
        "small_blind": { "value": config.small_blind, "source": sources.small_blind },
        "big_blind": { "value": config.big_blind, "source": sources.big_blind },
        "bot_count": { "value": config.bot_count, "source": sources.bot_count },
        "bot_delay_ms": { "value": config.bot_delay_ms, "source": sources.bot_delay_ms },
        "seed": { "value": config.seed, "source": sources.seed },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
