//! One module per subcommand. Handlers take their output streams as
//! parameters and return `Result<(), CliError>`.

pub mod cfg;
pub mod eval;
pub mod practice;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use eval::handle_eval_command;
pub use practice::{PracticeOptions, handle_practice_command};
pub use sim::handle_sim_command;
