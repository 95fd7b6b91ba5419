//! JSON job description: catalog, walls and optional run parameters.

use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::model::{Catalog, WallSpec};
use crate::report::SimulationReport;
use crate::simulation::Simulation;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A complete simulation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub catalog: Catalog,
    pub walls: Vec<WallSpec>,
    /// Run parameters; defaults apply when absent.
    #[serde(default)]
    pub config: Option<SimulationConfig>,
}

impl Job {
    /// Run parameters from the job, or the defaults.
    pub fn config(&self) -> SimulationConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Simulate the job with the given parameters.
    pub fn run(&self, config: SimulationConfig) -> Result<SimulationReport> {
        Simulation::new(&self.catalog, config).run(&self.walls)
    }
}

/// Decode a job from JSON text.
pub fn parse_job(text: &str) -> Result<Job> {
    let job: Job = serde_json::from_str(text)?;
    debug!(
        sheets = job.catalog.len(),
        walls = job.walls.len(),
        "parsed job"
    );
    Ok(job)
}

/// Read and decode a job file.
pub fn load_job(path: &Path) -> Result<Job> {
    if !path.exists() {
        return Err(SimError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    parse_job(&text)
}
