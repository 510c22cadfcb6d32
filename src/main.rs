//! CVRP Benchmark Harness - Command Line Interface
//!
//! Runs the trial/aggregation pipeline on single instances or whole
//! directories, and renders comparison charts from four result bundles.

use clap::{Parser, Subcommand};
use vrp_bench::batch::{export_results_csv, summary_report, BatchEvaluator};
use vrp_bench::comparison::{ComparisonDataset, ComparisonRenderer};
use vrp_bench::instance::VrpInstance;
use vrp_bench::metrics::{aggregate, InstanceResult};
use vrp_bench::solution::{ReferenceSolution, Solution};
use vrp_bench::solver::{Solver, SolverError, SolverParams};
use vrp_bench::trial::{TrialConfig, TrialRunner};
use vrp_bench::validator::CapacityValidator;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "vrp-bench")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "A benchmarking harness for stochastic CVRP heuristics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a solver on one instance/reference pair
    Evaluate {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Path to the reference solution (defaults to the instance path
        /// with a .sol extension)
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Number of independent trials
        #[arg(short, long, default_value = "5")]
        trials: usize,

        /// Initial temperature
        #[arg(long, default_value = "1000")]
        initial_temp: f64,

        /// Final temperature
        #[arg(long, default_value = "5")]
        final_temp: f64,

        /// Cooling rate
        #[arg(long, default_value = "0.99")]
        cooling_rate: f64,

        /// Maximum iterations per run
        #[arg(long, default_value = "100")]
        max_iterations: usize,

        /// Run trials in parallel
        #[arg(long)]
        parallel: bool,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write the aggregated result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate every instance below a directory
    Batch {
        /// Directory containing .vrp/.sol pairs
        #[arg(short, long)]
        dir: PathBuf,

        /// Number of independent trials per instance
        #[arg(short, long, default_value = "5")]
        trials: usize,

        /// Initial temperature
        #[arg(long, default_value = "1000")]
        initial_temp: f64,

        /// Final temperature
        #[arg(long, default_value = "5")]
        final_temp: f64,

        /// Cooling rate
        #[arg(long, default_value = "0.99")]
        cooling_rate: f64,

        /// Maximum iterations per run
        #[arg(long, default_value = "100")]
        max_iterations: usize,

        /// Run trials in parallel
        #[arg(long)]
        parallel: bool,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write per-instance results as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render comparison charts from four result bundles
    Compare {
        /// JSON result for tabu search
        #[arg(long)]
        tabu: PathBuf,

        /// JSON result for simulated annealing
        #[arg(long)]
        annealing: PathBuf,

        /// JSON result for local search
        #[arg(long)]
        local_search: PathBuf,

        /// JSON result for greedy construction
        #[arg(long)]
        greedy: PathBuf,

        /// Output directory for the SVG charts
        #[arg(short, long, default_value = "charts")]
        output: PathBuf,
    },

    /// Print statistics about an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            instance,
            reference,
            trials,
            initial_temp,
            final_temp,
            cooling_rate,
            max_iterations,
            parallel,
            seed,
            output,
        } => {
            let params = SolverParams {
                initial_temperature: initial_temp,
                final_temperature: final_temp,
                cooling_rate,
                max_iterations,
            };
            evaluate_instance(&instance, reference, trials, params, parallel, seed, output);
        }

        Commands::Batch {
            dir,
            trials,
            initial_temp,
            final_temp,
            cooling_rate,
            max_iterations,
            parallel,
            seed,
            output,
        } => {
            let params = SolverParams {
                initial_temperature: initial_temp,
                final_temperature: final_temp,
                cooling_rate,
                max_iterations,
            };
            run_batch(&dir, trials, params, parallel, seed, output);
        }

        Commands::Compare {
            tabu,
            annealing,
            local_search,
            greedy,
            output,
        } => {
            compare_results(&tabu, &annealing, &local_search, &greedy, &output);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }
    }
}

/// Bundled stand-in solver so the pipeline can run end to end.
///
/// Shuffles the customers and packs them into routes by capacity. Real
/// heuristics are supplied by callers through the `Solver` trait; this one
/// exists only to exercise the harness and ignores the annealing-style
/// hyperparameters.
struct RandomizedConstruction {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomizedConstruction {
    fn new(seed: u64) -> Self {
        RandomizedConstruction {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Solver for RandomizedConstruction {
    fn solve(
        &self,
        instance: &VrpInstance,
        _params: &SolverParams,
    ) -> Result<(Solution, f64), SolverError> {
        let mut customers: Vec<usize> = (1..instance.dimension).collect();
        {
            let mut rng = self.rng.lock().map_err(|_| "rng lock poisoned")?;
            customers.shuffle(&mut *rng);
        }

        let mut routes: Vec<Vec<usize>> = Vec::new();
        let mut route: Vec<usize> = Vec::new();
        let mut load = 0i32;

        for customer in customers {
            let demand = instance.nodes[customer].demand;
            if load + demand > instance.capacity && !route.is_empty() {
                routes.push(route);
                route = Vec::new();
                load = 0;
            }
            route.push(customer);
            load += demand;
        }
        if !route.is_empty() {
            routes.push(route);
        }

        let cost = routes.iter().map(|r| instance.route_cost(r)).sum();
        Ok((Solution::new(routes), cost))
    }
}

fn evaluate_instance(
    path: &PathBuf,
    reference: Option<PathBuf>,
    trials: usize,
    params: SolverParams,
    parallel: bool,
    seed: u64,
    output: Option<PathBuf>,
) {
    let instance = match VrpInstance::from_file(path) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    let reference_path = reference.unwrap_or_else(|| path.with_extension("sol"));
    let reference = match ReferenceSolution::from_file(&reference_path) {
        Ok(reference) => reference,
        Err(e) => {
            eprintln!("Error loading reference solution: {}", e);
            std::process::exit(1);
        }
    };

    let reference_cost = match reference.cost {
        Some(cost) => cost,
        None => {
            eprintln!("Reference file {:?} has no cost line", reference_path);
            std::process::exit(1);
        }
    };

    println!(
        "Evaluating {} against reference cost {} ({} trials)...",
        instance.name, reference_cost, trials
    );

    let solver = RandomizedConstruction::new(seed);
    let config = TrialConfig {
        trials,
        params,
        parallel,
    };
    let runner = TrialRunner::new(&solver, &CapacityValidator, config);
    let records = runner.run(&instance, reference_cost);

    match aggregate(&records, trials) {
        Some(result) => {
            println!("\n========== Results ==========");
            println!("Instance: {}", instance.name);
            println!("{}", result);

            if let Some(out_path) = output {
                let json = serde_json::to_string_pretty(&result).expect("serialize result");
                std::fs::write(&out_path, json).expect("Failed to write output");
                println!("\nResult saved to {:?}", out_path);
            }
        }
        None => {
            println!("\nNo successful trials for {}", instance.name);
        }
    }
}

fn run_batch(
    dir: &PathBuf,
    trials: usize,
    params: SolverParams,
    parallel: bool,
    seed: u64,
    output: Option<PathBuf>,
) {
    println!("Scanning {:?} for instances...", dir);

    let solver = RandomizedConstruction::new(seed);
    let config = TrialConfig {
        trials,
        params,
        parallel,
    };
    let evaluator = BatchEvaluator::new(&solver, &CapacityValidator, config);
    let results = evaluator.evaluate_directory(dir);

    println!("\n{}", summary_report(&results));

    if let Some(out_path) = output {
        export_results_csv(&results, &out_path).expect("Failed to export results");
        println!("Results exported to {:?}", out_path);
    }
}

fn compare_results(
    tabu: &PathBuf,
    annealing: &PathBuf,
    local_search: &PathBuf,
    greedy: &PathBuf,
    output: &PathBuf,
) {
    let dataset = ComparisonDataset::new(
        load_result(tabu),
        load_result(annealing),
        load_result(local_search),
        load_result(greedy),
    );

    let renderer = ComparisonRenderer::new();
    match renderer.render_all(&dataset, output) {
        Ok(()) => {
            println!("Comparison charts written to {:?}:", output);
            for name in [
                "execution_time.svg",
                "cost.svg",
                "proximity.svg",
                "diversity.svg",
                "radar.svg",
            ] {
                println!("  {}", name);
            }
        }
        Err(e) => {
            eprintln!("Error rendering charts: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_result(path: &PathBuf) -> InstanceResult {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error opening {:?}: {}", path, e);
            std::process::exit(1);
        }
    };

    match serde_json::from_reader(file) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error parsing {:?}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = match VrpInstance::from_file(path) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let demands: Vec<i32> = instance
        .nodes
        .iter()
        .filter(|n| !n.is_depot())
        .map(|n| n.demand)
        .collect();

    if !demands.is_empty() {
        let avg = demands.iter().sum::<i32>() as f64 / demands.len() as f64;
        let max = demands.iter().max().copied().unwrap_or(0);
        let min = demands.iter().min().copied().unwrap_or(0);

        println!("Demand Statistics:");
        println!("  Average: {:.2}", avg);
        println!("  Min: {}", min);
        println!("  Max: {}", max);
        if instance.capacity > 0 {
            println!(
                "  Capacity utilization ratio: {:.2}%",
                avg / instance.capacity as f64 * 100.0
            );
        }
    }
}
