//! Rounded 2D positions on a wall.

use crate::config::{round4, ROUND_DECIMALS};
use serde::Serialize;

/// Quantized position used as a map key (units of 10^-4).
pub type PositionKey = (i64, i64);

/// A location on a wall, rounded to four decimals on construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Create a new position, rounding both coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: round4(x),
            y: round4(y),
        }
    }

    /// The wall origin.
    pub fn origin() -> Self {
        Self::default()
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Return a new position offset by `(dx, dy)`.
    ///
    /// Does not check that the result lies on the wall.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Quantized key for ledger lookups.
    pub fn key(&self) -> PositionKey {
        let factor = 10f64.powi(ROUND_DECIMALS);
        (
            (self.x * factor).round() as i64,
            (self.y * factor).round() as i64,
        )
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
