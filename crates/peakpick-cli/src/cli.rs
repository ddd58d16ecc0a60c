use clap::{Args, Parser, Subcommand, ValueHint};
use peakpick_core::report::DEFAULT_COLUMNS;
use std::path::PathBuf;

use crate::common::{ConfigArgs, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "peakpick", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the input, solve the selection model and print the report
    Run(RunArgs),
    /// Write the model as a CPLEX LP file without solving it
    Export {
        #[command(flatten)]
        config: ConfigArgs,
        /// Output LP file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Print the generated input series
    Generate {
        #[command(flatten)]
        config: ConfigArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// External solver utilities
    Solver {
        #[command(subcommand)]
        command: SolverCommands,
    },
    /// Configuration utilities
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Report columns, space or comma separated
    #[arg(long, default_value = DEFAULT_COLUMNS)]
    pub columns: String,

    /// Only print steps with y = 1
    #[arg(long)]
    pub active_only: bool,

    /// Write the t, X_in, x, X0 series to this CSV file for plotting
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub plot: Option<PathBuf>,

    /// Echo solver output to the log at info level
    #[arg(long)]
    pub tee: bool,

    /// Fail when the returned solution violates the model
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum SolverCommands {
    /// Show which solver binaries are available
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::parse_from([
            "peakpick",
            "run",
            "--steps",
            "10",
            "--threshold",
            "20.5",
            "--solver",
            "highs",
            "--format",
            "json",
            "--active-only",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config.steps, Some(10));
        assert_eq!(args.config.threshold, Some(20.5));
        assert_eq!(
            args.config.solver,
            Some(peakpick_solver_common::SolverId::Highs)
        );
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.active_only);
        assert_eq!(args.columns, DEFAULT_COLUMNS);
    }

    #[test]
    fn test_unknown_solver_rejected_by_parser() {
        assert!(Cli::try_parse_from(["peakpick", "run", "--solver", "glpk"]).is_err());
    }
}
