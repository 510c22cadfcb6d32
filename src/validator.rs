//! Feasibility validation of candidate solutions.
//!
//! The harness treats validation as a swappable collaborator: the built-in
//! [`CapacityValidator`] checks capacity and coverage constraints, but any
//! [`Validator`] implementation may be substituted.

use crate::instance::VrpInstance;
use crate::solution::Solution;
use crate::solver::SolverError;

/// Outcome of validating one candidate solution.
#[derive(Debug, Clone)]
pub struct FeasibilityReport {
    /// Whether the solution satisfies all constraints
    pub feasible: bool,
    /// Human-readable constraint violations, empty when feasible
    pub violations: Vec<String>,
    /// Load carried by each route, in route order
    pub route_loads: Vec<i32>,
}

/// A feasibility check for candidate solutions.
///
/// An `Err` from `validate` counts as a trial fault and drops the trial; an
/// infeasible solution is a normal outcome reported through the record.
pub trait Validator: Send + Sync {
    fn validate(
        &self,
        instance: &VrpInstance,
        solution: &Solution,
    ) -> Result<FeasibilityReport, SolverError>;
}

/// Checks vehicle capacity per route and exactly-once customer coverage.
pub struct CapacityValidator;

impl Validator for CapacityValidator {
    fn validate(
        &self,
        instance: &VrpInstance,
        solution: &Solution,
    ) -> Result<FeasibilityReport, SolverError> {
        let mut violations = Vec::new();
        let mut route_loads = Vec::with_capacity(solution.routes.len());
        let mut visits = vec![0usize; instance.dimension];

        for (r, route) in solution.routes.iter().enumerate() {
            let mut load = 0i32;
            for &node in route {
                if node == 0 {
                    violations.push(format!("route {} visits the depot", r + 1));
                    continue;
                }
                if node >= instance.dimension {
                    violations.push(format!("route {} visits unknown node {}", r + 1, node));
                    continue;
                }
                load += instance.nodes[node].demand;
                visits[node] += 1;
            }

            if load > instance.capacity {
                violations.push(format!(
                    "route {} carries {} over capacity {}",
                    r + 1,
                    load,
                    instance.capacity
                ));
            }
            route_loads.push(load);
        }

        for (node, &count) in visits.iter().enumerate().skip(1) {
            if count == 0 {
                violations.push(format!("customer {} is never visited", node));
            } else if count > 1 {
                violations.push(format!("customer {} is visited {} times", node, count));
            }
        }

        Ok(FeasibilityReport {
            feasible: violations.is_empty(),
            violations,
            route_loads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Node;

    fn test_instance() -> VrpInstance {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0),
            Node::new(1, 1.0, 0.0, 4),
            Node::new(2, 0.0, 1.0, 3),
            Node::new(3, 1.0, 1.0, 5),
        ];
        VrpInstance {
            name: "test".to_string(),
            comment: String::new(),
            dimension: 4,
            capacity: 10,
            nodes,
            distance_matrix: vec![vec![0.0; 4]; 4],
        }
    }

    #[test]
    fn test_feasible_solution() {
        let instance = test_instance();
        let solution = Solution::new(vec![vec![1, 2], vec![3]]);

        let report = CapacityValidator.validate(&instance, &solution).unwrap();
        assert!(report.feasible);
        assert!(report.violations.is_empty());
        assert_eq!(report.route_loads, vec![7, 5]);
    }

    #[test]
    fn test_capacity_violation() {
        let instance = test_instance();
        let solution = Solution::new(vec![vec![1, 2, 3]]);

        let report = CapacityValidator.validate(&instance, &solution).unwrap();
        assert!(!report.feasible);
        assert_eq!(report.route_loads, vec![12]);
        assert!(report.violations.iter().any(|v| v.contains("capacity")));
    }

    #[test]
    fn test_missing_and_duplicate_customers() {
        let instance = test_instance();
        let solution = Solution::new(vec![vec![1, 1]]);

        let report = CapacityValidator.validate(&instance, &solution).unwrap();
        assert!(!report.feasible);
        assert!(report.violations.iter().any(|v| v.contains("visited 2 times")));
        assert!(report.violations.iter().any(|v| v.contains("never visited")));
    }

    #[test]
    fn test_unknown_node() {
        let instance = test_instance();
        let solution = Solution::new(vec![vec![1, 2, 3, 9]]);

        let report = CapacityValidator.validate(&instance, &solution).unwrap();
        assert!(!report.feasible);
        assert!(report.violations.iter().any(|v| v.contains("unknown node 9")));
    }
}
