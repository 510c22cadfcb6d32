//! Directory-level evaluation.
//!
//! Scans a directory tree for instance files, pairs each with its
//! reference solution, runs the trial pipeline per instance and collects
//! the aggregated results. A broken instance is skipped, never fatal.

use crate::instance::VrpInstance;
use crate::metrics::{aggregate, cost_key, InstanceResult};
use crate::solution::ReferenceSolution;
use crate::solver::Solver;
use crate::trial::{TrialConfig, TrialRunner};
use crate::validator::Validator;

use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Extension of instance files picked up by the scan.
const INSTANCE_EXTENSION: &str = "vrp";
/// Extension of the companion reference-solution files.
const REFERENCE_EXTENSION: &str = "sol";

/// Runs the trial pipeline over every instance below a directory.
pub struct BatchEvaluator<'a> {
    solver: &'a dyn Solver,
    validator: &'a dyn Validator,
    config: TrialConfig,
}

impl<'a> BatchEvaluator<'a> {
    pub fn new(solver: &'a dyn Solver, validator: &'a dyn Validator, config: TrialConfig) -> Self {
        BatchEvaluator {
            solver,
            validator,
            config,
        }
    }

    /// Evaluate every `.vrp` file below `dir` against its `.sol` companion.
    ///
    /// Instances whose companion is missing or unparseable are skipped with
    /// a warning, as are instances where every trial failed. The returned
    /// map is keyed by instance file name; entry order is incidental.
    pub fn evaluate_directory<P: AsRef<Path>>(&self, dir: P) -> HashMap<String, InstanceResult> {
        let mut files = Vec::new();
        if let Err(e) = collect_instance_files(dir.as_ref(), &mut files) {
            log::error!("cannot scan {}: {}", dir.as_ref().display(), e);
            return HashMap::new();
        }
        files.sort();

        log::info!("found {} instance files under {}", files.len(), dir.as_ref().display());

        let bar = ProgressBar::new(files.len() as u64);
        let mut results = HashMap::new();

        for path in &files {
            if let Some((name, result)) = self.evaluate_instance(path) {
                results.insert(name, result);
            }
            bar.inc(1);
        }

        bar.finish_and_clear();
        results
    }

    /// Evaluate one instance/reference pair, or `None` when it is skipped.
    fn evaluate_instance(&self, path: &Path) -> Option<(String, InstanceResult)> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let reference_path = path.with_extension(REFERENCE_EXTENSION);
        if !reference_path.exists() {
            log::warn!("skipping {}: no reference solution file", name);
            return None;
        }

        let instance = match VrpInstance::from_file(path) {
            Ok(instance) => instance,
            Err(e) => {
                log::warn!("skipping {}: {}", name, e);
                return None;
            }
        };

        let reference = match ReferenceSolution::from_file(&reference_path) {
            Ok(reference) => reference,
            Err(e) => {
                log::warn!("skipping {}: {}", name, e);
                return None;
            }
        };

        let reference_cost = match reference.cost {
            Some(cost) => cost,
            None => {
                log::warn!("skipping {}: reference file has no cost line", name);
                return None;
            }
        };

        log::info!("evaluating {} ({} trials)", name, self.config.trials);

        let runner = TrialRunner::new(self.solver, self.validator, self.config.clone());
        let records = runner.run(&instance, reference_cost);

        match aggregate(&records, self.config.trials) {
            Some(result) => Some((name, result)),
            None => {
                log::warn!("no successful trials for {}", name);
                None
            }
        }
    }
}

fn collect_instance_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_instance_files(&path, out)?;
        } else if path
            .extension()
            .map(|e| e == INSTANCE_EXTENSION)
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    instance: &'a str,
    average_cost: f64,
    min_cost: f64,
    max_cost: f64,
    valid_percentage: f64,
    average_execution_time: f64,
    average_proximity: Option<f64>,
    diversity: f64,
    convergence_rate: f64,
    trials_requested: usize,
    trials_completed: usize,
}

/// Export batch results to CSV, one row per instance, sorted by name.
pub fn export_results_csv<P: AsRef<Path>>(
    results: &HashMap<String, InstanceResult>,
    path: P,
) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut names: Vec<&String> = results.keys().collect();
    names.sort();

    for name in names {
        let r = &results[name];
        writer.serialize(CsvRow {
            instance: name,
            average_cost: r.average_cost,
            min_cost: r.min_cost,
            max_cost: r.max_cost,
            valid_percentage: r.valid_percentage,
            average_execution_time: r.average_execution_time,
            average_proximity: r.average_proximity,
            diversity: r.diversity,
            convergence_rate: r.convergence_rate,
            trials_requested: r.trials_requested,
            trials_completed: r.trials_completed,
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Human-readable summary of batch results, best average cost first.
pub fn summary_report(results: &HashMap<String, InstanceResult>) -> String {
    let mut report = String::new();

    report.push_str("========================================\n");
    report.push_str("        CVRP Benchmark Summary\n");
    report.push_str("========================================\n");
    report.push_str(&format!(
        "Generated: {}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    if results.is_empty() {
        report.push_str("No instances produced results.\n");
        return report;
    }

    let mut rows: Vec<(&String, &InstanceResult)> = results.iter().collect();
    rows.sort_by_key(|(_, r)| cost_key(r));

    report.push_str(&format!(
        "{:<25} {:>12} {:>12} {:>12} {:>8} {:>10} {:>10} {:>8}\n",
        "Instance", "Avg Cost", "Min Cost", "Max Cost", "Valid%", "Avg Time", "Proximity", "Conv%"
    ));
    report.push_str("-".repeat(104).as_str());
    report.push('\n');

    for (name, r) in &rows {
        let proximity = r
            .average_proximity
            .map(|p| format!("{:.2}%", p))
            .unwrap_or_else(|| "-".to_string());

        report.push_str(&format!(
            "{:<25} {:>12.2} {:>12.2} {:>12.2} {:>7.1}% {:>9.4}s {:>10} {:>7.2}%\n",
            name,
            r.average_cost,
            r.min_cost,
            r.max_cost,
            r.valid_percentage,
            r.average_execution_time,
            proximity,
            r.convergence_rate
        ));
    }

    report.push_str("-".repeat(104).as_str());
    report.push('\n');
    report.push_str(&format!("{} instance(s) evaluated\n", rows.len()));

    report
}
