//! Aggregation of trial records into per-instance statistics.

use crate::trial::TrialRecord;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Aggregated statistics over all trials of one instance and parameter set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceResult {
    /// Mean cost over completed trials
    pub average_cost: f64,
    /// Best cost found
    pub min_cost: f64,
    /// Worst cost found
    pub max_cost: f64,
    /// Feasible solutions as a percentage of *requested* trials
    pub valid_percentage: f64,
    /// Mean solver wall-clock time in seconds
    pub average_execution_time: f64,
    /// Mean proximity to the reference cost; `None` when never computable
    pub average_proximity: Option<f64>,
    /// Sample variance of trial costs; 0 with fewer than two trials
    pub diversity: f64,
    /// Relative improvement from the first trial to the best, in percent
    pub convergence_rate: f64,
    /// Trials requested for this configuration
    pub trials_requested: usize,
    /// Trials that produced a record
    pub trials_completed: usize,
}

impl std::fmt::Display for InstanceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "    Average Cost: {:.2}", self.average_cost)?;
        writeln!(f, "    Min Cost: {:.2}", self.min_cost)?;
        writeln!(f, "    Max Cost: {:.2}", self.max_cost)?;
        writeln!(f, "    Valid Solutions: {:.2}%", self.valid_percentage)?;
        writeln!(
            f,
            "    Average Execution Time: {:.4} seconds",
            self.average_execution_time
        )?;
        match self.average_proximity {
            Some(p) => writeln!(f, "    Average Proximity: {:.2}%", p)?,
            None => writeln!(f, "    Average Proximity: n/a")?,
        }
        writeln!(f, "    Diversity: {:.2}", self.diversity)?;
        writeln!(f, "    Convergence Rate: {:.2}%", self.convergence_rate)?;
        write!(
            f,
            "    Trials: {}/{} completed",
            self.trials_completed, self.trials_requested
        )
    }
}

/// Percentage distance between a trial cost and the reference cost.
///
/// `None` when the reference cost is zero; the metric is undefined there
/// and must not be computed.
pub fn proximity_to_reference(reference_cost: i64, cost: f64) -> Option<f64> {
    if reference_cost == 0 {
        return None;
    }
    let reference = reference_cost as f64;
    Some((reference - cost).abs() / reference * 100.0)
}

/// Reduce trial records into an [`InstanceResult`].
///
/// Pure and total: returns `None` on an empty record list or a zero
/// requested count instead of dividing by zero. The convergence rate uses
/// the first record in input (submission) order.
pub fn aggregate(records: &[TrialRecord], requested: usize) -> Option<InstanceResult> {
    if records.is_empty() || requested == 0 {
        return None;
    }

    let costs: Vec<f64> = records.iter().map(|r| r.cost).collect();
    let times: Vec<f64> = records.iter().map(|r| r.execution_time).collect();
    let proximities: Vec<f64> = records.iter().filter_map(|r| r.proximity).collect();
    let feasible = records.iter().filter(|r| r.is_feasible).count();

    let average_cost = costs.as_slice().mean();
    let min_cost = costs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_cost = costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let diversity = if costs.len() > 1 {
        costs.as_slice().variance()
    } else {
        0.0
    };

    let first_cost = records[0].cost;
    let convergence_rate = if first_cost != 0.0 {
        (first_cost - min_cost) / first_cost * 100.0
    } else {
        0.0
    };

    let average_proximity = if proximities.is_empty() {
        None
    } else {
        Some(proximities.as_slice().mean())
    };

    Some(InstanceResult {
        average_cost,
        min_cost,
        max_cost,
        valid_percentage: feasible as f64 / requested as f64 * 100.0,
        average_execution_time: times.as_slice().mean(),
        average_proximity,
        diversity,
        convergence_rate,
        trials_requested: requested,
        trials_completed: records.len(),
    })
}

/// Sort key for float-valued result columns.
pub fn cost_key(result: &InstanceResult) -> OrderedFloat<f64> {
    OrderedFloat(result.average_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cost: f64, proximity: Option<f64>, is_feasible: bool) -> TrialRecord {
        TrialRecord {
            cost,
            execution_time: 0.5,
            proximity,
            is_feasible,
        }
    }

    fn scripted_records() -> Vec<TrialRecord> {
        [100.0, 90.0, 95.0, 80.0]
            .iter()
            .map(|&c| record(c, proximity_to_reference(80, c), true))
            .collect()
    }

    #[test]
    fn test_deterministic_scenario() {
        let result = aggregate(&scripted_records(), 4).unwrap();

        assert!((result.average_cost - 91.25).abs() < 1e-9);
        assert_eq!(result.min_cost, 80.0);
        assert_eq!(result.max_cost, 100.0);
        assert!((result.convergence_rate - 20.0).abs() < 1e-9);
        // sample variance of [100, 90, 95, 80] is 218.75 / 3
        assert!((result.diversity - 218.75 / 3.0).abs() < 1e-6);
        assert_eq!(result.valid_percentage, 100.0);
        assert_eq!(result.trials_completed, 4);
    }

    #[test]
    fn test_empty_records_yield_none() {
        assert!(aggregate(&[], 5).is_none());
        assert!(aggregate(&scripted_records(), 0).is_none());
    }

    #[test]
    fn test_single_record_has_zero_diversity() {
        let result = aggregate(&[record(42.0, None, true)], 1).unwrap();
        assert_eq!(result.diversity, 0.0);
        assert_eq!(result.convergence_rate, 0.0);
        assert!(result.average_proximity.is_none());
    }

    #[test]
    fn test_feasibility_uses_requested_denominator() {
        // 4 completed and feasible trials out of 5 requested
        let result = aggregate(&scripted_records(), 5).unwrap();
        assert!((result.valid_percentage - 80.0).abs() < 1e-9);
        assert_eq!(result.trials_requested, 5);
    }

    #[test]
    fn test_feasibility_bounds() {
        let records: Vec<TrialRecord> =
            (0..10).map(|i| record(10.0 + i as f64, None, i % 2 == 0)).collect();
        let result = aggregate(&records, 10).unwrap();
        assert!(result.valid_percentage >= 0.0 && result.valid_percentage <= 100.0);
        assert_eq!(result.valid_percentage, 50.0);
    }

    #[test]
    fn test_proximity_definition() {
        // zero exactly at the reference cost
        assert_eq!(proximity_to_reference(80, 80.0), Some(0.0));
        // symmetric for overshoot and undershoot
        let over = proximity_to_reference(80, 100.0).unwrap();
        let under = proximity_to_reference(80, 60.0).unwrap();
        assert!((over - under).abs() < 1e-9);
        assert!((over - 25.0).abs() < 1e-9);
        // undefined for a zero reference
        assert_eq!(proximity_to_reference(0, 50.0), None);
    }

    #[test]
    fn test_zero_first_cost_convergence() {
        let records = vec![record(0.0, None, true), record(5.0, None, true)];
        let result = aggregate(&records, 2).unwrap();
        assert_eq!(result.convergence_rate, 0.0);
    }
}
