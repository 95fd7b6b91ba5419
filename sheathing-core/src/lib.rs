//! sheathing-core - Core library for wall sheathing simulation.
//!
//! Covers walls with stock sheets nailed to studs, row by row, subject to
//! stud alignment, opening-corner and joint-stagger rules, and reuses the
//! offcuts left by earlier placements before cutting fresh stock.
//!
//! # Example
//!
//! ```no_run
//! use sheathing_core::{load_job, ReuseStrategy};
//! use std::path::Path;
//!
//! let job = load_job(Path::new("house.json")).unwrap();
//! let config = job.config().with_strategy(ReuseStrategy::WallToWall);
//! let report = job.run(config).unwrap();
//! println!("mean waste: {}", report.mean_waste_area());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod job;
pub mod model;
pub mod report;
pub mod rules;
pub mod simulation;
pub mod validation;

// Re-exports for convenience
pub use config::{ReuseLimits, ReuseStrategy, RuleTolerances, SimulationConfig};
pub use engine::{Engine, StepOutcome, Sweep};
pub use error::{ErrorCode, Result, SimError};
pub use geometry::{Position, Rect};
pub use job::{load_job, parse_job, Job};
pub use model::{
    Catalog, Cut, CutId, CutKind, OpeningSpec, Panel, PanelId, StockPanel, Wall, WallSpec,
    WasteLedger,
};
pub use report::{SimulationReport, TrialReport, WallOutcome, WallReport, WallSummary};
pub use rules::Rejection;
pub use simulation::{Simulation, WallRun};
pub use validation::{validate_job, ValidationResult};

/// Load a job file and simulate it with the job's own parameters.
///
/// This is the main high-level entry point:
/// 1. Parse the job file
/// 2. Validate catalog, walls and parameters
/// 3. Run every trial
pub fn simulate_job_file(path: &std::path::Path) -> Result<SimulationReport> {
    let job = load_job(path)?;
    let config = job.config();
    job.run(config)
}
