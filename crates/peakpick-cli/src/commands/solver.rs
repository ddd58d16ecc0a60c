//! External solver discovery commands.

use anyhow::Result;
use peakpick_cli::SolverCommands;
use peakpick_solver_common::subprocess::SOLVER_DIR_ENV;
use peakpick_solver_common::{SolverId, SolverProcess};

/// Handle solver subcommands.
pub fn handle(command: &SolverCommands) -> Result<()> {
    match command {
        SolverCommands::List => list_solvers(),
    }
}

/// List supported solvers and where their binaries were found.
fn list_solvers() -> Result<()> {
    println!("Supported solvers:");
    println!();

    for &id in SolverId::all() {
        let status = match SolverProcess::find_binary(id) {
            Ok(path) => format!("[installed] {}", path.display()),
            Err(_) => "[not installed]".to_string(),
        };
        println!(
            "  {:<8} {:<26} {}",
            id.binary_name(),
            id.description(),
            status
        );
    }

    println!();
    println!(
        "Solvers are looked up in ${}, ~/.peakpick/solvers and PATH.",
        SOLVER_DIR_ENV
    );
    Ok(())
}
