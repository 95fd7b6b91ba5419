//! sheathing-sim - CLI tool to simulate sheathing walls with stock panels.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sheathing_core::{load_job, validate_job, ReuseStrategy, SimulationConfig, SimulationReport};

/// Offcut reuse strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Always cut fresh sheets
    FreshOnly,
    /// Largest usable offcut first
    Greedy,
    /// Only offcuts that end on a stud
    BestFit,
    /// Best-fit then greedy, carrying waste between walls
    WallToWall,
}

impl From<StrategyArg> for ReuseStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FreshOnly => ReuseStrategy::FreshOnly,
            StrategyArg::Greedy => ReuseStrategy::Greedy,
            StrategyArg::BestFit => ReuseStrategy::BestFit,
            StrategyArg::WallToWall => ReuseStrategy::WallToWall,
        }
    }
}

/// Simulate covering walls with stock sheets nailed to studs, reusing offcuts.
#[derive(Parser, Debug)]
#[command(name = "sheathing-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input job file (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output report file (JSON); printed to stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of trials
    #[arg(short, long)]
    trials: Option<u32>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Offcut reuse strategy
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Maximum times an offcut may be re-cut
    #[arg(long)]
    max_cuts: Option<u32>,

    /// Minimum reusable offcut width (ft)
    #[arg(long)]
    min_width: Option<f64>,

    /// Validate only, don't simulate
    #[arg(long)]
    validate: bool,

    /// Print per-wall summaries instead of the full report
    #[arg(long)]
    summary: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Apply command-line overrides on top of the job's parameters.
fn apply_overrides(mut config: SimulationConfig, args: &Args) -> SimulationConfig {
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if let Some(max_cuts) = args.max_cuts {
        config.max_cuts = max_cuts;
    }
    if let Some(min_width) = args.min_width {
        config.min_width = min_width;
    }
    config
}

fn print_summary(report: &SimulationReport) {
    for summary in report.summaries() {
        println!(
            "trial {:>3}  {:<16} panels {:>3}  waste {:>8.2}  pending {:>8.2}  restarts {:>2}  {:?}",
            summary.trial,
            summary.wall,
            summary.panels,
            summary.total_waste_area,
            summary.remaining_waste_area,
            summary.restarts,
            summary.outcome,
        );
    }
    println!(
        "strategy {}  trials {}  mean waste {:.2}",
        report.strategy,
        report.trials.len(),
        report.mean_waste_area()
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Processing: {}", args.input.display());

    let job = load_job(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    info!(
        "Loaded {} wall(s) and {} sheet type(s)",
        job.walls.len(),
        job.catalog.len()
    );

    let config = apply_overrides(job.config(), &args);

    // Validate
    let validation = validate_job(&job.catalog, &job.walls, &config)?;

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if !validation.passed {
        anyhow::bail!("Validation failed");
    }

    // Validate-only mode
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    info!(
        "Simulating {} trial(s) with {} reuse, seed {}",
        config.trials, config.strategy, config.seed
    );

    let report = job
        .run(config)
        .with_context(|| format!("Simulation of {} failed", args.input.display()))?;

    if args.summary {
        print_summary(&report);
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Generated: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
