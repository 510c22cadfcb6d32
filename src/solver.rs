//! The solver seam.
//!
//! Heuristic solvers live outside this crate. They plug in through the
//! [`Solver`] trait: given an instance and a hyperparameter set, produce a
//! candidate [`Solution`] and its cost. Any conforming implementation may
//! be substituted; closures with the matching signature work directly.

use crate::instance::VrpInstance;
use crate::solution::Solution;

/// Opaque error raised by a solver or validator during one trial.
pub type SolverError = Box<dyn std::error::Error + Send + Sync>;

/// Hyperparameters handed to every solver invocation.
///
/// The fields follow the annealing-style contract shared by all compared
/// heuristics; implementations are free to ignore the ones they do not use.
#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    /// Initial temperature
    pub initial_temperature: f64,
    /// Final temperature
    pub final_temperature: f64,
    /// Cooling rate per step
    pub cooling_rate: f64,
    /// Maximum iterations per run
    pub max_iterations: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            initial_temperature: 1000.0,
            final_temperature: 5.0,
            cooling_rate: 0.99,
            max_iterations: 100,
        }
    }
}

/// A heuristic solver for one CVRP instance.
pub trait Solver: Send + Sync {
    /// Run the heuristic once and return a candidate solution with its cost.
    fn solve(
        &self,
        instance: &VrpInstance,
        params: &SolverParams,
    ) -> Result<(Solution, f64), SolverError>;
}

impl<F> Solver for F
where
    F: Fn(&VrpInstance, &SolverParams) -> Result<(Solution, f64), SolverError> + Send + Sync,
{
    fn solve(
        &self,
        instance: &VrpInstance,
        params: &SolverParams,
    ) -> Result<(Solution, f64), SolverError> {
        self(instance, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = SolverParams::default();
        assert_eq!(params.initial_temperature, 1000.0);
        assert_eq!(params.final_temperature, 5.0);
        assert_eq!(params.cooling_rate, 0.99);
        assert_eq!(params.max_iterations, 100);
    }

    #[test]
    fn test_closure_solver() {
        let solver = |_: &VrpInstance, _: &SolverParams| -> Result<(Solution, f64), SolverError> {
            Ok((Solution::new(vec![vec![1, 2]]), 12.5))
        };

        let instance = crate::instance::VrpInstance {
            name: "t".to_string(),
            comment: String::new(),
            dimension: 3,
            capacity: 10,
            nodes: vec![
                crate::instance::Node::new(0, 0.0, 0.0, 0),
                crate::instance::Node::new(1, 1.0, 0.0, 5),
                crate::instance::Node::new(2, 0.0, 1.0, 5),
            ],
            distance_matrix: vec![vec![0.0; 3]; 3],
        };

        let (solution, cost) = Solver::solve(&solver, &instance, &SolverParams::default()).unwrap();
        assert_eq!(solution.routes, vec![vec![1, 2]]);
        assert_eq!(cost, 12.5);
    }
}
