use clap::Parser;
use peakpick_cli::{Cli, Commands};
use std::io::IsTerminal;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
    if let Err(err) = installed {
        eprintln!("failed to install log subscriber: {err}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let (name, result) = match &cli.command {
        Commands::Run(args) => ("Run", commands::run::handle(args)),
        Commands::Export { config, output } => ("Export", commands::export::handle(config, output)),
        Commands::Generate { config, format } => {
            ("Generate", commands::generate::handle(config, *format))
        }
        Commands::Solver { command } => ("Solver", commands::solver::handle(command)),
        Commands::Config { command } => ("Config", commands::config::handle(command)),
    };

    if let Err(e) = result {
        error!("{} command failed: {:#}", name, e);
        std::process::exit(1);
    }
}
