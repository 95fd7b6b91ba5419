//! Setup-time validation of walls, openings, catalog and run parameters.

use crate::config::float_cmp::{at_most, past, within};
use crate::config::{SimulationConfig, EPS};
use crate::error::{Result, SimError};
use crate::model::{Catalog, OpeningSpec, StockPanel, WallSpec};

/// Outcome of checking a job: problems that block the run go to `errors`,
/// suspicious but runnable input to `warnings`.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate a whole job.
///
/// An empty catalog or wall list is an immediate error; everything else is
/// collected into the result.
pub fn validate_job(
    catalog: &Catalog,
    walls: &[WallSpec],
    config: &SimulationConfig,
) -> Result<ValidationResult> {
    if catalog.is_empty() {
        return Err(SimError::EmptyCatalog);
    }
    if walls.is_empty() {
        return Err(SimError::NoWalls);
    }

    let mut result = validate_config(config);
    result.merge(validate_catalog(catalog, config.row_height));

    for wall in walls {
        result.merge(validate_wall(wall));
    }

    let mut names: Vec<&str> = walls.iter().map(|w| w.name.as_str()).collect();
    names.sort_unstable();
    for pair in names.windows(2) {
        if pair[0] == pair[1] {
            result.add_warning(format!("Wall '{}': Name used more than once", pair[0]));
        }
    }

    Ok(result)
}

/// Validate run parameters.
pub fn validate_config(config: &SimulationConfig) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if config.row_height.is_nan() || config.row_height <= 0.0 {
        result.add_error(format!("Invalid row height {}", config.row_height));
    }
    if config.trials == 0 {
        result.add_warning("Trial count is zero, nothing will be simulated");
    }
    if config.min_width < 0.0 {
        result.add_error(format!("Invalid minimum offcut width {}", config.min_width));
    }
    if config.max_cuts == 0 && config.strategy.uses_greedy() {
        result.add_warning(format!(
            "Maximum cut count is zero, {} reuse will never match",
            config.strategy
        ));
    }

    result
}

/// Problems that make a stock sheet unusable.
pub fn stock_errors(stock: &StockPanel, row_height: f64) -> Vec<SimError> {
    let mut errors = Vec::new();
    let invalid = |reason: String| SimError::InvalidStock {
        name: stock.name.clone(),
        reason,
    };

    if !stock.width.is_finite() || !stock.height.is_finite() || stock.width < EPS || stock.height < EPS {
        errors.push(invalid(format!(
            "invalid dimensions ({}x{})",
            stock.width, stock.height
        )));
    } else if past(row_height, stock.height) {
        errors.push(invalid(format!(
            "height {} is less than the row height {}",
            stock.height, row_height
        )));
    }

    errors
}

/// Validate the stock catalog.
pub fn validate_catalog(catalog: &Catalog, row_height: f64) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for stock in catalog.iter() {
        for err in stock_errors(stock, row_height) {
            result.add_error(err.to_string());
        }
    }

    let mut names: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    if names.len() != catalog.len() {
        result.add_warning("Catalog contains duplicate sheet names");
    }

    result
}

fn opening_error(wall: &WallSpec, label: &str, index: usize, spec: &OpeningSpec) -> Option<SimError> {
    let finite = [spec.start_x, spec.start_y, spec.end_x, spec.end_y]
        .iter()
        .all(|v| v.is_finite());
    let (min_x, min_y, max_x, max_y) = spec.bounds();
    if finite && past(max_x, min_x) && past(max_y, min_y) {
        return None;
    }
    Some(SimError::InvalidOpening {
        wall: wall.name.clone(),
        reason: format!(
            "{} {} is empty ({}, {}) to ({}, {})",
            label,
            index + 1,
            spec.start_x,
            spec.start_y,
            spec.end_x,
            spec.end_y
        ),
    })
}

/// Problems that prevent a wall from being simulated.
pub fn wall_errors(wall: &WallSpec) -> Vec<SimError> {
    let mut errors = Vec::new();

    if !wall.length.is_finite()
        || !wall.height.is_finite()
        || wall.length <= 0.0
        || wall.height <= 0.0
    {
        errors.push(SimError::InvalidWall {
            wall: wall.name.clone(),
            reason: format!("invalid dimensions ({}x{})", wall.length, wall.height),
        });
    }

    let has_stud = wall
        .studs
        .iter()
        .any(|&s| s.is_finite() && s >= 0.0 && at_most(s, wall.length));
    if !has_stud {
        errors.push(SimError::NoStuds {
            wall: wall.name.clone(),
        });
    }

    for (idx, door) in wall.doors.iter().enumerate() {
        errors.extend(opening_error(wall, "Door", idx, door));
    }
    for (idx, window) in wall.windows.iter().enumerate() {
        errors.extend(opening_error(wall, "Window", idx, window));
    }

    errors
}

/// Validate a single wall.
pub fn validate_wall(wall: &WallSpec) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for err in wall_errors(wall) {
        result.add_error(err.to_string());
    }

    let outside = wall
        .studs
        .iter()
        .filter(|&&s| !(s >= 0.0 && at_most(s, wall.length)))
        .count();
    if outside > 0 {
        result.add_warning(format!(
            "Wall '{}': {} stud(s) outside the wall are ignored",
            wall.name, outside
        ));
    }

    if !wall.studs.iter().any(|&s| within(s, 0.0, 0.0)) {
        result.add_warning(format!("Wall '{}': No stud at the start of the wall", wall.name));
    }
    if !wall.studs.iter().any(|&s| within(s, wall.length, 0.0)) {
        result.add_warning(format!(
            "Wall '{}': No stud at the end of the wall, rows will stop short",
            wall.name
        ));
    }

    for opening in wall.doors.iter().chain(wall.windows.iter()) {
        let (min_x, min_y, max_x, max_y) = opening.bounds();
        if min_x < 0.0 || min_y < 0.0 || past(max_x, wall.length) || past(max_y, wall.height) {
            result.add_warning(format!(
                "Wall '{}': Opening ({}, {}) to ({}, {}) extends beyond the wall",
                wall.name, opening.start_x, opening.start_y, opening.end_x, opening.end_y
            ));
        }
    }

    result
}

/// Validate and fail on the first fatal problem.
///
/// Typed errors from the catalog and walls are returned as-is; remaining
/// failures are joined into [`SimError::ValidationFailed`]. On success the
/// result carries any warnings.
pub fn ensure_valid(
    catalog: &Catalog,
    walls: &[WallSpec],
    config: &SimulationConfig,
) -> Result<ValidationResult> {
    let result = validate_job(catalog, walls, config)?;

    if let Some(err) = catalog
        .iter()
        .flat_map(|s| stock_errors(s, config.row_height))
        .chain(walls.iter().flat_map(wall_errors))
        .next()
    {
        return Err(err);
    }

    if !result.passed {
        return Err(SimError::ValidationFailed {
            message: result.errors.join("; "),
        });
    }

    Ok(result)
}
