//! # pokerroom CLI
//!
//! Terminal front end for the practice table.
//!
//! - `practice`: play against computer opponents, `q` to leave
//! - `sim`: computer-only hands with a summary and chip conservation check
//! - `eval`: best five-card hand among 5 to 7 cards
//! - `cfg`: resolved settings and their sources
//!
//! ```no_run
//! use std::io;
//! let args = vec!["pokerroom", "sim", "--hands", "50", "--seed", "7"];
//! let code = pokerroom_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
mod macros;
pub mod ui;
pub mod validation;

use cli::{Commands, PokerroomCli};
use commands::{
    PracticeOptions, handle_cfg_command, handle_eval_command, handle_practice_command,
    handle_sim_command,
};
pub use error::CliError;
use pokerroom_table::LogFormat;

const COMMANDS: &[&str] = &["practice", "sim", "eval", "cfg"];

/// Parses `args` and runs the subcommand. Returns the process exit code:
/// `0` on success, `2` on any error.
///
/// ```
/// use std::io;
/// let args = vec!["pokerroom", "eval", "As", "Ks", "Qs", "Js", "10s"];
/// let mut out = Vec::new();
/// let code = pokerroom_cli::run(args, &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("Royal Flush"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match PokerroomCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return write_usage_error(e, out, err),
    };

    let (format, filter) = match (cli.log_json, cli.verbose) {
        (true, true) => (LogFormat::Json, "debug"),
        (true, false) => (LogFormat::Json, "warn"),
        (false, true) => (LogFormat::Text, "debug"),
        (false, false) => (LogFormat::Text, "warn"),
    };
    // Fails only when a subscriber is already installed (repeated calls in one process).
    let _ = pokerroom_table::init_logging(format, filter);

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Eval { cards } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_eval_command(&cards, &mut stdin_lock, out, err)
        }
        Commands::Sim {
            hands,
            players,
            seed,
        } => config::load_with_sources()
            .map_err(CliError::from)
            .and_then(|resolved| {
                let players = players
                    .map(usize::from)
                    .unwrap_or(resolved.config.bot_count + 1);
                handle_sim_command(hands, players, seed, &resolved.config, out, err)
            }),
        Commands::Practice {
            name,
            avatar,
            bots,
            seed,
            hands,
            bot_delay_ms,
        } => config::load_with_sources()
            .map_err(CliError::from)
            .and_then(|resolved| {
                let opts = PracticeOptions {
                    name,
                    avatar,
                    bots: bots.map(usize::from),
                    seed,
                    hands,
                    bot_delay_ms,
                };
                let stdin = std::io::stdin();
                let mut stdin_lock = stdin.lock();
                handle_practice_command(opts, &resolved.config, &mut stdin_lock, out, err)
            }),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

fn write_usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and succeed
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    write_or_exit!(err, "{}", e);
    write_or_exit!(err, "pokerroom: practice Texas Hold'em in the terminal");
    write_or_exit!(err, "Usage: pokerroom <command> [options]\n");
    write_or_exit!(err, "Commands:");
    for c in COMMANDS {
        write_or_exit!(err, "  {}", c);
    }
    write_or_exit!(err, "\nFor full help, run: pokerroom --help");
    exit_code::ERROR
}
