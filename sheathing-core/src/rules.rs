//! Placement rules: stud alignment, opening-corner exclusion, joint stagger.

use crate::config::float_cmp::{at_most, within};
use crate::config::RuleTolerances;
use crate::model::{OpeningKind, Wall};
use serde::Serialize;

/// Why a candidate edge was refused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum Rejection {
    /// Seam would land near a door or window corner.
    AroundOpening { x: f64 },
    /// Seam would line up with a joint in the row below.
    Stagger { x: f64 },
    /// No stud between the cursor and the candidate edge.
    NoStudInSpan,
    /// A panel already occupies the cursor position.
    Occupied,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::AroundOpening { x } => write!(f, "seam at {:.4} is near an opening", x),
            Rejection::Stagger { x } => write!(f, "seam at {:.4} is not staggered", x),
            Rejection::NoStudInSpan => write!(f, "no stud inside the candidate span"),
            Rejection::Occupied => write!(f, "position already occupied"),
        }
    }
}

/// Whether `x` sits on a stud.
pub fn on_stud(wall: &Wall, x: f64, tol: &RuleTolerances) -> bool {
    wall.studs()
        .iter()
        .any(|&s| within(x, s, tol.stud_half_width))
}

/// Largest stud at or below `x`, counting a stud within the stud half-width above it.
pub fn landing_stud(wall: &Wall, x: f64, tol: &RuleTolerances) -> Option<f64> {
    let limit = x + tol.stud_half_width;
    wall.studs()
        .iter()
        .copied()
        .take_while(|&s| at_most(s, limit))
        .last()
}

/// Whether a seam at `x` in the row at `y` falls near a door or window corner.
///
/// Positions within the wall-edge margin of the far edge are exempt. An
/// opening is skipped when the row lies entirely below or above it.
pub fn around_opening_corner(
    wall: &Wall,
    x: f64,
    y: f64,
    row_height: f64,
    tol: &RuleTolerances,
) -> bool {
    if x >= wall.length - tol.wall_edge_margin {
        return false;
    }

    wall.openings().iter().any(|opening| {
        if y + row_height < opening.start_y() || y > opening.end_y() {
            return false;
        }
        let band = match opening.kind {
            OpeningKind::Door => &tol.door,
            OpeningKind::Window => &tol.window,
        };
        band.contains(x, opening.start_x(), opening.end_x())
    })
}

/// Whether a seam at `x` lines up with a joint recorded in the previous row.
pub fn violates_stagger(wall: &Wall, row: usize, x: f64, tol: &RuleTolerances) -> bool {
    if row == 0 {
        return false;
    }
    wall.joints(row - 1).iter().any(|&j| {
        tol.stagger_bounds
            .contains(x, j - tol.stagger_band, j + tol.stagger_band)
    })
}

/// Run the opening and stagger checks for a seam at `x`.
pub fn check_seam(
    wall: &Wall,
    row: usize,
    x: f64,
    y: f64,
    row_height: f64,
    tol: &RuleTolerances,
) -> Result<(), Rejection> {
    if around_opening_corner(wall, x, y, row_height, tol) {
        return Err(Rejection::AroundOpening { x });
    }
    if violates_stagger(wall, row, x, tol) {
        return Err(Rejection::Stagger { x });
    }
    Ok(())
}
