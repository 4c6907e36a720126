//! Argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pokerroom",
    version,
    about = "Practice Texas Hold'em against computer opponents"
)]
pub struct PokerroomCli {
    /// Show debug diagnostics on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play interactively against computer opponents
    Practice {
        /// Your name at the table
        #[arg(long, default_value = "Player")]
        name: String,
        #[arg(long)]
        avatar: Option<String>,
        /// Computer opponents (1-5)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        bots: Option<u8>,
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many hands
        #[arg(long)]
        hands: Option<u32>,
        /// Pause before each computer action
        #[arg(long)]
        bot_delay_ms: Option<u64>,
    },
    /// Play hands between computer opponents and summarize the results
    Sim {
        #[arg(long, default_value_t = 100)]
        hands: u32,
        /// Seats at the table (2-6)
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=6))]
        players: Option<u8>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Name the best five-card hand among 5 to 7 cards
    Eval {
        /// Cards such as `As Kd 10h`; read from stdin when omitted
        cards: Vec<String>,
    },
    /// Show resolved settings and where each value came from
    Cfg,
}
