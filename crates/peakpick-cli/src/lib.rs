pub mod cli;
pub mod common;
pub mod output;

pub use cli::{Cli, Commands, ConfigCommands, RunArgs, SolverCommands};
pub use common::{ConfigArgs, OutputFormat};
