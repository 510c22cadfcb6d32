//! Repeated trial execution for one instance and parameter set.
//!
//! The runner executes N independent stochastic runs of a solver, times
//! each run, validates the produced solution and records the outcome. A
//! failing trial is dropped and never aborts the batch.

use crate::instance::VrpInstance;
use crate::metrics::proximity_to_reference;
use crate::solver::{Solver, SolverError, SolverParams};
use crate::validator::Validator;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of one successful trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Cost reported by the solver
    pub cost: f64,
    /// Solver wall-clock time in seconds
    pub execution_time: f64,
    /// Percentage distance to the reference cost; `None` when the
    /// reference cost is zero
    pub proximity: Option<f64>,
    /// Whether the validator accepted the solution
    pub is_feasible: bool,
}

/// Trial execution configuration.
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Number of independent runs
    pub trials: usize,
    /// Hyperparameters handed to every run
    pub params: SolverParams,
    /// Execute trials on the rayon pool
    pub parallel: bool,
}

impl Default for TrialConfig {
    fn default() -> Self {
        TrialConfig {
            trials: 5,
            params: SolverParams::default(),
            parallel: false,
        }
    }
}

/// Runs a solver repeatedly against one instance.
pub struct TrialRunner<'a> {
    solver: &'a dyn Solver,
    validator: &'a dyn Validator,
    config: TrialConfig,
}

impl<'a> TrialRunner<'a> {
    pub fn new(solver: &'a dyn Solver, validator: &'a dyn Validator, config: TrialConfig) -> Self {
        TrialRunner {
            solver,
            validator,
            config,
        }
    }

    /// Execute the configured number of trials.
    ///
    /// Returns one record per trial that completed; a solver or validator
    /// error drops that trial and the remaining trials proceed. An empty
    /// vec means no data, not a zero-cost result. Records keep submission
    /// order even under parallel execution.
    pub fn run(&self, instance: &VrpInstance, reference_cost: i64) -> Vec<TrialRecord> {
        let n = self.config.trials;

        if self.config.parallel {
            (0..n)
                .into_par_iter()
                .map(|i| self.attempt(instance, reference_cost, i, n))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect()
        } else {
            (0..n)
                .filter_map(|i| self.attempt(instance, reference_cost, i, n))
                .collect()
        }
    }

    fn attempt(
        &self,
        instance: &VrpInstance,
        reference_cost: i64,
        index: usize,
        total: usize,
    ) -> Option<TrialRecord> {
        match self.run_one(instance, reference_cost) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!(
                    "trial {}/{} on {} dropped: {}",
                    index + 1,
                    total,
                    instance.name,
                    e
                );
                None
            }
        }
    }

    fn run_one(
        &self,
        instance: &VrpInstance,
        reference_cost: i64,
    ) -> Result<TrialRecord, SolverError> {
        let start = Instant::now();
        let (solution, cost) = self.solver.solve(instance, &self.config.params)?;
        let execution_time = start.elapsed().as_secs_f64();

        let report = self.validator.validate(instance, &solution)?;

        Ok(TrialRecord {
            cost,
            execution_time,
            proximity: proximity_to_reference(reference_cost, cost),
            is_feasible: report.feasible,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Node;
    use crate::solution::Solution;
    use crate::validator::CapacityValidator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_instance() -> VrpInstance {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0),
            Node::new(1, 1.0, 0.0, 4),
            Node::new(2, 0.0, 1.0, 3),
        ];
        VrpInstance {
            name: "test".to_string(),
            comment: String::new(),
            dimension: 3,
            capacity: 10,
            nodes,
            distance_matrix: vec![vec![0.0; 3]; 3],
        }
    }

    /// Stub solver replaying a fixed cost sequence across calls.
    fn scripted_solver(costs: &'static [f64]) -> impl Solver {
        let calls = AtomicUsize::new(0);
        move |_: &VrpInstance, _: &SolverParams| -> Result<(Solution, f64), SolverError> {
            let i = calls.fetch_add(1, Ordering::SeqCst);
            Ok((Solution::new(vec![vec![1, 2]]), costs[i % costs.len()]))
        }
    }

    #[test]
    fn test_records_follow_submission_order() {
        let solver = scripted_solver(&[100.0, 90.0, 95.0, 80.0]);
        let runner = TrialRunner::new(
            &solver,
            &CapacityValidator,
            TrialConfig {
                trials: 4,
                ..Default::default()
            },
        );

        let records = runner.run(&test_instance(), 80);
        let costs: Vec<f64> = records.iter().map(|r| r.cost).collect();
        assert_eq!(costs, vec![100.0, 90.0, 95.0, 80.0]);
        assert!(records.iter().all(|r| r.is_feasible));
        assert!(records.iter().all(|r| r.execution_time >= 0.0));
    }

    #[test]
    fn test_failing_trials_are_isolated() {
        let calls = AtomicUsize::new(0);
        let solver = move |_: &VrpInstance,
                           _: &SolverParams|
              -> Result<(Solution, f64), SolverError> {
            let i = calls.fetch_add(1, Ordering::SeqCst);
            if i % 2 == 1 {
                return Err("solver blew up".into());
            }
            Ok((Solution::new(vec![vec![1, 2]]), 50.0 + i as f64))
        };

        let runner = TrialRunner::new(
            &solver,
            &CapacityValidator,
            TrialConfig {
                trials: 6,
                ..Default::default()
            },
        );

        let records = runner.run(&test_instance(), 50);
        assert_eq!(records.len(), 3);
        let costs: Vec<f64> = records.iter().map(|r| r.cost).collect();
        assert_eq!(costs, vec![50.0, 52.0, 54.0]);
    }

    #[test]
    fn test_all_failures_yield_no_data() {
        let solver = |_: &VrpInstance, _: &SolverParams| -> Result<(Solution, f64), SolverError> {
            Err("always broken".into())
        };

        let runner = TrialRunner::new(&solver, &CapacityValidator, TrialConfig::default());
        let records = runner.run(&test_instance(), 100);
        assert!(records.is_empty());
    }

    #[test]
    fn test_infeasible_solutions_are_recorded() {
        // customer 2 is never visited, so every solution is rejected
        let solver = |_: &VrpInstance, _: &SolverParams| -> Result<(Solution, f64), SolverError> {
            Ok((Solution::new(vec![vec![1]]), 10.0))
        };

        let runner = TrialRunner::new(
            &solver,
            &CapacityValidator,
            TrialConfig {
                trials: 2,
                ..Default::default()
            },
        );

        let records = runner.run(&test_instance(), 10);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.is_feasible));
    }

    #[test]
    fn test_parallel_preserves_submission_order() {
        let solver = scripted_solver(&[100.0, 90.0, 95.0, 80.0]);
        let runner = TrialRunner::new(
            &solver,
            &CapacityValidator,
            TrialConfig {
                trials: 4,
                parallel: true,
                ..Default::default()
            },
        );

        let records = runner.run(&test_instance(), 80);
        assert_eq!(records.len(), 4);
        // parallel trials may observe the scripted sequence in any order,
        // but the record list still follows submission order
        let mut costs: Vec<f64> = records.iter().map(|r| r.cost).collect();
        costs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(costs, vec![80.0, 90.0, 95.0, 100.0]);
    }

    #[test]
    fn test_zero_reference_skips_proximity() {
        let solver = scripted_solver(&[100.0]);
        let runner = TrialRunner::new(
            &solver,
            &CapacityValidator,
            TrialConfig {
                trials: 1,
                ..Default::default()
            },
        );

        let records = runner.run(&test_instance(), 0);
        assert_eq!(records.len(), 1);
        assert!(records[0].proximity.is_none());
    }
}
