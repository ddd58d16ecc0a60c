//! Subprocess management for external solvers.
//!
//! Handles locating solver binaries, spawning them against a temporary LP
//! file and reading back their solution files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::backend::MilpSolver;
use crate::error::{SolverError, SolverResult};
use crate::lp::write_lp_file;
use crate::problem::LpProblem;
use crate::solfile::{read_cbc, read_highs};
use crate::solution::SolverSolution;
use crate::SolverId;

/// Environment variable naming an extra directory to search for solvers.
pub const SOLVER_DIR_ENV: &str = "PEAKPICK_SOLVER_DIR";

/// Seconds the watchdog waits beyond the solver's own time limit.
pub const WATCHDOG_GRACE_SECS: u64 = 30;

/// Lines of solver output kept in a failure message.
const FAILURE_TAIL_LINES: usize = 20;

/// A solver subprocess handle.
pub struct SolverProcess {
    /// The solver being used.
    solver_id: SolverId,
    /// Path to the solver binary.
    binary_path: PathBuf,
    /// Time limit handed to the solver (0 = stop as soon as possible).
    time_limit_secs: u64,
    /// Echo solver output at info level instead of debug.
    tee: bool,
}

impl SolverProcess {
    /// Create a new solver process handle.
    pub fn new(solver_id: SolverId, binary_path: PathBuf, time_limit_secs: u64) -> Self {
        Self {
            solver_id,
            binary_path,
            time_limit_secs,
            tee: false,
        }
    }

    /// Locate the solver binary and create a handle for it.
    pub fn locate(solver_id: SolverId, time_limit_secs: u64) -> SolverResult<Self> {
        let binary_path = Self::find_binary(solver_id)?;
        debug!("Using {} at {}", solver_id, binary_path.display());
        Ok(Self::new(solver_id, binary_path, time_limit_secs))
    }

    /// Forward solver output at info level.
    pub fn with_tee(mut self, tee: bool) -> Self {
        self.tee = tee;
        self
    }

    /// Find the solver binary in standard locations.
    ///
    /// Search order:
    /// 1. `$PEAKPICK_SOLVER_DIR/<binary_name>`
    /// 2. `~/.peakpick/solvers/<binary_name>`
    /// 3. System PATH
    pub fn find_binary(solver_id: SolverId) -> SolverResult<PathBuf> {
        let binary_name = solver_id.binary_name();

        if let Some(dir) = std::env::var_os(SOLVER_DIR_ENV) {
            let candidate = PathBuf::from(dir).join(binary_name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let candidate = home.join(".peakpick").join("solvers").join(binary_name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        if let Ok(path) = which::which(binary_name) {
            return Ok(path);
        }

        Err(SolverError::NotInstalled {
            solver: solver_id,
            binary: binary_name.to_string(),
        })
    }

    /// Command line for the solver.
    fn command_args(&self, lp_path: &Path, sol_path: &Path) -> Vec<OsString> {
        let limit = self.time_limit_secs.to_string();
        match self.solver_id {
            SolverId::Cbc => vec![
                "-sec".into(),
                limit.into(),
                "-printingOptions".into(),
                "all".into(),
                "-import".into(),
                lp_path.into(),
                "-solve".into(),
                "-solu".into(),
                sol_path.into(),
            ],
            SolverId::Highs => vec![
                "--model_file".into(),
                lp_path.into(),
                "--time_limit".into(),
                limit.into(),
                "--solution_file".into(),
                sol_path.into(),
            ],
        }
    }

    /// Solve a problem by spawning the solver subprocess.
    ///
    /// This method:
    /// 1. Writes the problem to `model.lp` in a fresh temp directory
    /// 2. Spawns the solver binary with the time limit as a solver option
    /// 3. Kills the solver if it outlives the limit by [`WATCHDOG_GRACE_SECS`]
    /// 4. Reads the solution file the solver wrote
    pub async fn solve(&self, problem: &LpProblem) -> SolverResult<SolverSolution> {
        let workdir = tempfile::Builder::new().prefix("peakpick-").tempdir()?;
        let lp_path = workdir.path().join("model.lp");
        let sol_path = workdir.path().join("model.sol");
        write_lp_file(problem, &lp_path)?;

        info!(
            "Solving with {}: {} columns ({} binary), {} rows, time limit {}s",
            self.solver_id,
            problem.num_columns(),
            problem.num_binaries(),
            problem.num_rows(),
            self.time_limit_secs
        );

        let start = Instant::now();
        let child = Command::new(&self.binary_path)
            .args(self.command_args(&lp_path, &sol_path))
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(SolverError::ProcessStart)?;

        let watchdog = Duration::from_secs(self.watchdog_secs());
        let output = match timeout(watchdog, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                // Dropping the future drops the child, which kills it.
                warn!(
                    "{} still running after {}s, killed",
                    self.solver_id,
                    watchdog.as_secs()
                );
                return Err(SolverError::Timeout {
                    seconds: watchdog.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().chain(stderr.lines()) {
            if self.tee {
                info!(target: "solver", "{}", line);
            } else {
                debug!(target: "solver", "{}", line);
            }
        }

        if !self.exit_accepted(output.status.code(), sol_path.is_file()) {
            return Err(SolverError::ProcessFailed {
                code: output.status.code(),
                message: tail(&stderr, &stdout),
            });
        }

        let text = tokio::fs::read_to_string(&sol_path).await.map_err(|e| {
            SolverError::SolutionFile(format!(
                "{} did not write {}: {}",
                self.solver_id,
                sol_path.display(),
                e
            ))
        })?;

        let mut solution = match self.solver_id {
            SolverId::Cbc => read_cbc(&text, problem)?,
            SolverId::Highs => read_highs(&text, problem)?,
        };
        solution.solve_time_ms = start.elapsed().as_millis() as i64;

        info!(
            "{} finished: status={}, objective={:?}, time={}ms",
            self.solver_id, solution.status, solution.objective, solution.solve_time_ms
        );

        Ok(solution)
    }

    /// Solve a problem synchronously (blocking).
    ///
    /// Runs [`solve`](Self::solve) on a current-thread runtime so callers stay
    /// single-threaded.
    pub fn solve_blocking(&self, problem: &LpProblem) -> SolverResult<SolverSolution> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.solve(problem))
    }

    /// Seconds before the watchdog kills the solver.
    fn watchdog_secs(&self) -> u64 {
        self.time_limit_secs.saturating_add(WATCHDOG_GRACE_SECS)
    }

    /// Whether the exit code still leaves a solution file worth reading.
    ///
    /// HiGHS exits with its `HighsStatus`, so a time or iteration limit
    /// ends with 1 (warning) after the solution file is written.
    fn exit_accepted(&self, code: Option<i32>, solution_written: bool) -> bool {
        match (self.solver_id, code) {
            (_, Some(0)) => true,
            (SolverId::Highs, Some(1)) => solution_written,
            _ => false,
        }
    }
}

impl MilpSolver for SolverProcess {
    fn name(&self) -> &str {
        self.solver_id.display_name()
    }

    fn solve(&self, problem: &LpProblem) -> SolverResult<SolverSolution> {
        self.solve_blocking(problem)
    }
}

/// Last lines of solver output, preferring stderr.
fn tail(stderr: &str, stdout: &str) -> String {
    let source = if stderr.trim().is_empty() { stdout } else { stderr };
    let lines: Vec<&str> = source.lines().collect();
    let start = lines.len().saturating_sub(FAILURE_TAIL_LINES);
    lines[start..].join("\n")
}

/// Check if a solver is installed and available.
pub fn is_solver_installed(solver_id: SolverId) -> bool {
    SolverProcess::find_binary(solver_id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::SolutionStatus;

    #[test]
    fn test_cbc_args_carry_time_limit_and_paths() {
        let proc = SolverProcess::new(SolverId::Cbc, PathBuf::from("cbc"), 5);
        let args = proc.command_args(Path::new("/tmp/m.lp"), Path::new("/tmp/m.sol"));
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args[0..2], ["-sec", "5"]);
        let import = args.iter().position(|a| a == "-import").unwrap();
        assert_eq!(args[import + 1], "/tmp/m.lp");
        let solve = args.iter().position(|a| a == "-solve").unwrap();
        assert!(solve > import);
        assert_eq!(args.last().unwrap(), "/tmp/m.sol");
    }

    #[test]
    fn test_highs_args() {
        let proc = SolverProcess::new(SolverId::Highs, PathBuf::from("highs"), 0);
        let args: Vec<String> = proc
            .command_args(Path::new("m.lp"), Path::new("m.sol"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["--model_file", "m.lp", "--time_limit", "0", "--solution_file", "m.sol"]
        );
    }

    #[test]
    fn test_tail_prefers_stderr() {
        assert_eq!(tail("boom\n", "ignored"), "boom");
        assert_eq!(tail("  ", "only stdout"), "only stdout");
    }

    #[test]
    fn test_missing_binary_fails_to_start() {
        let proc = SolverProcess::new(
            SolverId::Cbc,
            PathBuf::from("/nonexistent/peakpick/cbc"),
            1,
        );
        let mut problem = LpProblem::new("p", crate::ObjectiveSense::Maximize);
        problem.add_column("x", crate::VarDomain::NonNegative);
        let err = proc.solve_blocking(&problem).unwrap_err();
        assert!(matches!(err, SolverError::ProcessStart(_)));
    }

    #[cfg(unix)]
    fn one_column() -> LpProblem {
        let mut problem = LpProblem::new("p", crate::ObjectiveSense::Maximize);
        let x = problem.add_column("x", crate::VarDomain::NonNegative);
        problem.objective = vec![(x, 1.0)];
        problem
    }

    /// Shell script that writes `solution` to its last argument and exits
    /// with `code`.
    #[cfg(unix)]
    fn stub_solver(dir: &Path, name: &str, solution: &str, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        let script = format!(
            "#!/bin/sh\nfor a in \"$@\"; do last=\"$a\"; done\ncat > \"$last\" <<'SOL'\n{solution}SOL\nexit {code}\n"
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    const HIGHS_TIME_LIMIT: &str = "\
Model status
Time limit reached

# Primal solution values
Feasible
Objective 3
# Columns 1
x 3
";

    #[test]
    fn test_exit_codes_accepted_per_solver() {
        let highs = SolverProcess::new(SolverId::Highs, PathBuf::from("highs"), 5);
        assert!(highs.exit_accepted(Some(0), true));
        assert!(highs.exit_accepted(Some(1), true));
        assert!(!highs.exit_accepted(Some(1), false));
        assert!(!highs.exit_accepted(Some(2), true));
        assert!(!highs.exit_accepted(None, true));

        let cbc = SolverProcess::new(SolverId::Cbc, PathBuf::from("cbc"), 5);
        assert!(!cbc.exit_accepted(Some(1), true));
    }

    #[test]
    fn test_watchdog_saturates() {
        let proc = SolverProcess::new(SolverId::Cbc, PathBuf::from("cbc"), u64::MAX);
        assert_eq!(proc.watchdog_secs(), u64::MAX);
        let proc = SolverProcess::new(SolverId::Cbc, PathBuf::from("cbc"), 5);
        assert_eq!(proc.watchdog_secs(), 5 + WATCHDOG_GRACE_SECS);
    }

    #[cfg(unix)]
    #[test]
    fn test_highs_time_limit_exit_still_reads_incumbent() {
        let dir = tempfile::tempdir().unwrap();
        let stub = stub_solver(dir.path(), "highs", HIGHS_TIME_LIMIT, 1);
        let proc = SolverProcess::new(SolverId::Highs, stub, 0);

        let solution = proc.solve_blocking(&one_column()).unwrap();
        assert_eq!(solution.status, SolutionStatus::TimeLimit);
        assert!(solution.has_values);
        assert_eq!(solution.values, vec![3.0]);
        assert_eq!(solution.objective, Some(3.0));
    }

    #[cfg(unix)]
    #[test]
    fn test_cbc_failure_exit_is_process_failed() {
        let dir = tempfile::tempdir().unwrap();
        let stub = stub_solver(dir.path(), "cbc", "Optimal - objective value -3\n", 1);
        let proc = SolverProcess::new(SolverId::Cbc, stub, 1);
        let err = proc.solve_blocking(&one_column()).unwrap_err();
        assert!(matches!(err, SolverError::ProcessFailed { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_huge_time_limit_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let stub = stub_solver(
            dir.path(),
            "cbc",
            "Optimal - objective value -3\n      0 x   3   1\n",
            0,
        );
        let proc = SolverProcess::new(SolverId::Cbc, stub, u64::MAX);
        let solution = proc.solve_blocking(&one_column()).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.values, vec![3.0]);
    }
}
