//! CVRP Heuristic Benchmarking Harness
//!
//! Runs a stochastic routing heuristic repeatedly against an instance with
//! a known reference cost, validates every produced solution, aggregates
//! run-to-run statistics and compares four heuristic approaches through
//! normalized SVG charts.
//!
//! # Features
//!
//! - Repeated trial execution with per-trial fault isolation
//! - Metrics aggregation (cost spread, feasibility rate, proximity to the
//!   reference optimum, diversity, convergence rate)
//! - Directory-level batch evaluation with per-instance fault isolation
//! - Comparison charts for Tabu / Annealing / Local Search / Greedy
//! - Pluggable solver and validator interfaces
//!
//! # Example
//!
//! ```no_run
//! use vrp_bench::instance::VrpInstance;
//! use vrp_bench::metrics::aggregate;
//! use vrp_bench::solution::{ReferenceSolution, Solution};
//! use vrp_bench::solver::{SolverError, SolverParams};
//! use vrp_bench::trial::{TrialConfig, TrialRunner};
//! use vrp_bench::validator::CapacityValidator;
//!
//! let instance = VrpInstance::from_file("instance.vrp").unwrap();
//! let reference = ReferenceSolution::from_file("instance.sol").unwrap();
//!
//! // any conforming heuristic may be plugged in here
//! let solver = |instance: &VrpInstance, _: &SolverParams| -> Result<(Solution, f64), SolverError> {
//!     let route: Vec<usize> = (1..instance.dimension).collect();
//!     let cost = instance.route_cost(&route);
//!     Ok((Solution::new(vec![route]), cost))
//! };
//!
//! let runner = TrialRunner::new(&solver, &CapacityValidator, TrialConfig::default());
//! let records = runner.run(&instance, reference.cost.unwrap_or(0));
//!
//! match aggregate(&records, 5) {
//!     Some(result) => println!("{}", result),
//!     None => println!("no successful trials"),
//! }
//! ```

pub mod batch;
pub mod comparison;
pub mod instance;
pub mod metrics;
pub mod solution;
pub mod solver;
pub mod trial;
pub mod validator;

pub use comparison::{Algorithm, ComparisonDataset, ComparisonRenderer};
pub use instance::VrpInstance;
pub use metrics::{aggregate, InstanceResult};
pub use solution::{ReferenceSolution, Solution};
pub use solver::{Solver, SolverParams};
pub use trial::{TrialConfig, TrialRecord, TrialRunner};
pub use validator::{CapacityValidator, Validator};
