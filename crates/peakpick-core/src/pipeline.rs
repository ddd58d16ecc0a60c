//! End-to-end run: generate → assemble → solve → verify → report.

use peakpick_solver_common::MilpSolver;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::data::InputSeries;
use crate::error::PeakResult;
use crate::model::SelectionModel;
use crate::report::Report;
use crate::solve::{solve, Solution};
use crate::verify::{verify, Violation, DEFAULT_TOLERANCE};

/// Validate `config`, generate its input and assemble the model.
pub fn prepare(config: &RunConfig) -> PeakResult<SelectionModel> {
    config.validate()?;
    let input = InputSeries::generate(config.seed, config.steps, config.value_max)?;
    info!(
        "Generated {} input values (seed {}, range [0, {}))",
        input.len(),
        config.seed,
        config.value_max
    );
    SelectionModel::assemble(input, config.model_params())
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunResult {
    pub config: RunConfig,
    pub model: SelectionModel,
    /// Solve failures land here rather than aborting the run.
    pub outcome: PeakResult<Solution>,
    pub violations: Vec<Violation>,
}

impl RunResult {
    pub fn report(&self) -> Report {
        Report::from_outcome(self.model.input(), self.model.params(), &self.outcome)
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run the whole pipeline against `solver`.
///
/// Configuration errors are returned immediately. Once a model exists the
/// run always completes, and a failed solve is carried in
/// [`RunResult::outcome`].
pub fn run(config: &RunConfig, solver: &dyn MilpSolver) -> PeakResult<RunResult> {
    let model = prepare(config)?;
    let outcome = solve(&model, solver);

    let violations = match &outcome {
        Ok(solution) => {
            info!(
                "Objective {:.3}, {} of {} steps active ({:?})",
                solution.objective,
                solution.active_count(),
                model.steps(),
                solution.optimality
            );
            let found = verify(&model, solution, DEFAULT_TOLERANCE);
            for v in &found {
                warn!("Solution check: {}", v);
            }
            found
        }
        Err(err) => {
            warn!("{}", err);
            Vec::new()
        }
    };

    Ok(RunResult {
        config: config.clone(),
        model,
        outcome,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeakError;
    use crate::solve::Optimality;
    use crate::testing::{OracleSolver, Scripted};
    use peakpick_solver_common::SolutionStatus;

    fn small(steps: usize) -> RunConfig {
        RunConfig {
            steps,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_prepare_is_deterministic() {
        let a = prepare(&small(50)).unwrap();
        let b = prepare(&small(50)).unwrap();
        assert_eq!(a.input(), b.input());
        assert_eq!(a.problem(), b.problem());
    }

    #[test]
    fn test_zero_steps_fails_before_solving() {
        let err = run(&small(0), &OracleSolver).unwrap_err();
        assert!(matches!(err, PeakError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_zero_threshold_fails_before_solving() {
        let cfg = RunConfig {
            threshold: 0.0,
            ..small(10)
        };
        assert!(matches!(
            run(&cfg, &OracleSolver),
            Err(PeakError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_reference_run_selects_capped_peaks() {
        let cfg = RunConfig::default();
        let result = run(&cfg, &OracleSolver).unwrap();
        let solution = result.outcome.as_ref().unwrap();
        assert_eq!(solution.optimality, Optimality::Optimal);
        assert_eq!(solution.active_count(), 100);
        assert!(result.violations.is_empty());

        let input = result.model.input();
        for (t, x_in) in input.iter() {
            if solution.y[t] {
                assert!(x_in >= cfg.threshold);
                assert_eq!(solution.x[t], x_in);
            } else {
                assert_eq!(solution.x[t], 0.0);
            }
        }

        // No unselected step beats the smallest selected one.
        let smallest_selected = input
            .iter()
            .filter(|&(t, _)| solution.y[t])
            .map(|(_, v)| v)
            .fold(f64::INFINITY, f64::min);
        assert!(input
            .iter()
            .filter(|&(t, _)| !solution.y[t])
            .all(|(_, v)| v <= smallest_selected));
    }

    #[test]
    fn test_zero_cap_selects_nothing() {
        let cfg = RunConfig {
            max_active: 0,
            ..small(200)
        };
        let result = run(&cfg, &OracleSolver).unwrap();
        let solution = result.outcome.unwrap();
        assert_eq!(solution.active_count(), 0);
        assert_eq!(solution.objective, 0.0);
    }

    #[test]
    fn test_time_limit_without_incumbent_is_reported_not_raised() {
        let result = run(
            &RunConfig::default(),
            &Scripted::status(SolutionStatus::TimeLimit),
        )
        .unwrap();
        assert!(!result.is_success());
        assert!(matches!(result.outcome, Err(PeakError::SolveTimeLimit(_))));

        let report = result.report();
        assert_eq!(report.summary.status, "time_limit");
        assert!(report.rows.is_empty());
        assert_eq!(report.summary.steps, 20_000);
    }

    #[test]
    fn test_inconsistent_solver_values_are_flagged() {
        let cfg = small(3);
        let model = prepare(&cfg).unwrap();
        let mut values = vec![0.0; 6];
        // x_0 above its input with y_0 = 0.
        values[0] = model.input().get(0).unwrap_or(0.0) + 10.0;
        let solver = Scripted::with_values(SolutionStatus::Optimal, values, None);

        let result = run(&cfg, &solver).unwrap();
        assert!(result.is_success());
        assert!(result
            .violations
            .iter()
            .any(|v| matches!(v, Violation::ExceedsInput { t: 0, .. })));
        assert!(result
            .violations
            .iter()
            .any(|v| matches!(v, Violation::UnselectedFlow { t: 0, .. })));
    }

    #[test]
    fn test_report_matches_solution() {
        let result = run(&small(300), &OracleSolver).unwrap();
        let report = result.report();
        assert!(report.is_success());
        assert_eq!(report.rows.len(), 300);
        let solution = result.outcome.as_ref().unwrap();
        assert_eq!(report.summary.objective, Some(solution.objective));
        assert_eq!(report.active_rows().count(), solution.active_count());
    }

    #[test]
    fn test_time_limit_incumbent_is_reported_sub_optimal() {
        let cfg = small(4);
        let model = prepare(&cfg).unwrap();
        let mut values = vec![0.0; 8];
        if let Some((t, x_in)) = model.input().iter().find(|&(_, v)| v >= cfg.threshold) {
            values[t] = x_in;
            values[4 + t] = 1.0;
        }
        let solver = Scripted::with_values(SolutionStatus::TimeLimit, values.clone(), None);

        let result = run(&cfg, &solver).unwrap();
        assert!(result.is_success());
        let solution = result.outcome.as_ref().unwrap();
        assert_eq!(solution.optimality, Optimality::SubOptimal);
        assert_eq!(solution.x, values[..4]);
        assert!(result.violations.is_empty());

        let report = result.report();
        assert!(report.is_success());
        assert_eq!(report.summary.status, "sub_optimal");
        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.summary.objective, Some(values[..4].iter().sum::<f64>()));
    }
}
