//! Configuration constants and run parameters for the simulation.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Number of decimals every coordinate and derived dimension is rounded to.
pub const ROUND_DECIMALS: i32 = 4;

/// Nominal height of one row of horizontally laid sheets (ft).
pub const NOMINAL_ROW_HEIGHT: f64 = 4.0;

/// Half the width of a stud (1.5 in stud, rounded up to 0.125 ft).
pub const STUD_HALF_WIDTH: f64 = 0.0625;

/// Distance from the far wall edge inside which a row is considered done.
pub const WALL_EDGE_MARGIN: f64 = 0.125;

/// Distance from the far wall edge inside which no joint is recorded.
pub const JOINT_EDGE_MARGIN: f64 = 0.0625;

/// Joints closer than this to a joint in the row below must be staggered.
pub const STAGGER_BAND: f64 = 0.4;

/// Offcuts must be wider than this to resist buckling (16 in).
pub const MIN_BUCKLE_WIDTH: f64 = 1.33333;

/// Cursor advance used to push the cursor past the wall when a row ends.
pub const ROW_DONE_STEP: f64 = 1.0;

/// Consecutive steps without progress before a row is declared stalled.
pub const DEFAULT_STALL_BUDGET: u32 = 25;

/// Wall-to-wall restarts allowed before a wall is abandoned.
pub const DEFAULT_MAX_RESTARTS: u32 = 10;

/// Default maximum number of re-cuts for a reusable offcut.
pub const DEFAULT_MAX_CUTS: u32 = 10;

/// Default minimum width (ft) for a reusable offcut.
pub const DEFAULT_MIN_WIDTH: f64 = 1.0;

/// Round to [`ROUND_DECIMALS`] decimals.
#[inline]
pub fn round4(value: f64) -> f64 {
    let factor = 10f64.powi(ROUND_DECIMALS);
    let rounded = (value * factor).round() / factor;
    // Normalise -0.0 so keys and comparisons stay stable.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Offcut reuse strategy applied before a fresh sheet is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReuseStrategy {
    /// Never reuse offcuts.
    FreshOnly,
    /// First offcut (by area) meeting the size limits.
    #[default]
    Greedy,
    /// Only offcuts whose edge lands exactly on a stud.
    BestFit,
    /// Best-fit, then greedy, with waste carried from wall to wall.
    WallToWall,
}

impl ReuseStrategy {
    /// Whether the best-fit heuristic runs under this strategy.
    pub fn uses_best_fit(&self) -> bool {
        matches!(self, ReuseStrategy::BestFit | ReuseStrategy::WallToWall)
    }

    /// Whether the greedy heuristic runs under this strategy.
    pub fn uses_greedy(&self) -> bool {
        matches!(self, ReuseStrategy::Greedy | ReuseStrategy::WallToWall)
    }

    /// Whether waste is carried from one wall into the next.
    pub fn carries_waste(&self) -> bool {
        matches!(self, ReuseStrategy::WallToWall)
    }
}

impl std::fmt::Display for ReuseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReuseStrategy::FreshOnly => write!(f, "fresh-only"),
            ReuseStrategy::Greedy => write!(f, "greedy"),
            ReuseStrategy::BestFit => write!(f, "best-fit"),
            ReuseStrategy::WallToWall => write!(f, "wall-to-wall"),
        }
    }
}

/// Whether the ends of a tolerance band belong to the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bounds {
    #[default]
    Inclusive,
    Exclusive,
}

impl Bounds {
    /// Check whether `x` lies in `[min, max]` (or `(min, max)`).
    #[inline]
    pub fn contains(&self, x: f64, min: f64, max: f64) -> bool {
        match self {
            Bounds::Inclusive => x >= min && x <= max,
            Bounds::Exclusive => x > min && x < max,
        }
    }
}

/// Band around the start and end x of an opening where no seam may land.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningBand {
    /// Distance before the opening's start x.
    pub before_start: f64,
    /// Distance after the opening's start x.
    pub after_start: f64,
    /// Distance before the opening's end x.
    pub before_end: f64,
    /// Distance after the opening's end x.
    pub after_end: f64,
    /// Boundary convention for both bands.
    pub bounds: Bounds,
}

impl OpeningBand {
    /// Default band for doors.
    pub fn door() -> Self {
        Self {
            before_start: 1.0,
            after_start: 1.0,
            before_end: 0.125,
            after_end: 1.0,
            bounds: Bounds::Inclusive,
        }
    }

    /// Default band for windows.
    pub fn window() -> Self {
        Self {
            before_start: 1.0,
            after_start: 0.125,
            before_end: 0.125,
            after_end: 0.8,
            bounds: Bounds::Inclusive,
        }
    }

    /// Check whether `x` falls near the opening's start or end corner.
    pub fn contains(&self, x: f64, start_x: f64, end_x: f64) -> bool {
        self.bounds
            .contains(x, start_x - self.before_start, start_x + self.after_start)
            || self
                .bounds
                .contains(x, end_x - self.before_end, end_x + self.after_end)
    }
}

/// Tolerances used by the placement rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTolerances {
    /// Half the stud width; an edge within this distance sits on the stud.
    pub stud_half_width: f64,
    /// Far-edge margin for the row-done check and opening exemption.
    pub wall_edge_margin: f64,
    /// Far-edge margin inside which no joint is recorded.
    pub joint_edge_margin: f64,
    /// Half-width of the stagger band around joints of the row below.
    pub stagger_band: f64,
    /// Boundary convention of the stagger band.
    pub stagger_bounds: Bounds,
    /// Offcuts must be strictly wider than this to be reused.
    pub min_buckle_width: f64,
    /// Seam exclusion band around doors.
    pub door: OpeningBand,
    /// Seam exclusion band around windows.
    pub window: OpeningBand,
}

impl Default for RuleTolerances {
    fn default() -> Self {
        Self {
            stud_half_width: STUD_HALF_WIDTH,
            wall_edge_margin: WALL_EDGE_MARGIN,
            joint_edge_margin: JOINT_EDGE_MARGIN,
            stagger_band: STAGGER_BAND,
            stagger_bounds: Bounds::Inclusive,
            min_buckle_width: MIN_BUCKLE_WIDTH,
            door: OpeningBand::door(),
            window: OpeningBand::window(),
        }
    }
}

/// Size limits an offcut must meet to be reused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReuseLimits {
    /// Offcuts re-cut this many times or more are not reused.
    pub max_cuts: u32,
    /// Minimum offcut width.
    pub min_width: f64,
}

/// Simulation run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of trials to run.
    pub trials: u32,
    /// Base seed; trial `t` is seeded with `seed + t`.
    pub seed: u64,
    /// Offcut reuse strategy.
    pub strategy: ReuseStrategy,
    /// Maximum re-cut count for a reusable offcut.
    pub max_cuts: u32,
    /// Minimum width for a reusable offcut.
    pub min_width: f64,
    /// Height of a full row.
    pub row_height: f64,
    /// Consecutive non-progress steps before a row stalls.
    pub stall_budget: u32,
    /// Wall-to-wall restarts before a wall is abandoned.
    pub max_restarts: u32,
    /// Rule tolerances.
    pub tolerances: RuleTolerances,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 1,
            seed: 0,
            strategy: ReuseStrategy::default(),
            max_cuts: DEFAULT_MAX_CUTS,
            min_width: DEFAULT_MIN_WIDTH,
            row_height: NOMINAL_ROW_HEIGHT,
            stall_budget: DEFAULT_STALL_BUDGET,
            max_restarts: DEFAULT_MAX_RESTARTS,
            tolerances: RuleTolerances::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a configuration for the given strategy.
    pub fn new(strategy: ReuseStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Set the number of trials.
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the reuse strategy.
    pub fn with_strategy(mut self, strategy: ReuseStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the offcut reuse limits.
    pub fn with_limits(mut self, max_cuts: u32, min_width: f64) -> Self {
        self.max_cuts = max_cuts;
        self.min_width = min_width;
        self
    }

    /// Set the full row height.
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Set the stall budget and restart limit.
    pub fn with_stall_limits(mut self, stall_budget: u32, max_restarts: u32) -> Self {
        self.stall_budget = stall_budget;
        self.max_restarts = max_restarts;
        self
    }

    /// Reuse limits derived from this configuration.
    pub fn limits(&self) -> ReuseLimits {
        ReuseLimits {
            max_cuts: self.max_cuts,
            min_width: self.min_width,
        }
    }
}

/// Comparisons on rounded coordinates, with `EPS` slack.
pub mod float_cmp {
    use super::EPS;

    /// Whether `a` lies within `tol` of `b`.
    #[inline]
    pub fn within(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol + EPS
    }

    /// Whether `a` does not exceed `limit`.
    #[inline]
    pub fn at_most(a: f64, limit: f64) -> bool {
        a <= limit + EPS
    }

    /// Whether `a` lies clearly past `b`.
    #[inline]
    pub fn past(a: f64, b: f64) -> bool {
        a > b + EPS
    }
}
