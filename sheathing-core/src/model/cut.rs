//! Offcuts produced by trimming a panel.

use super::{CutId, PanelId};
use crate::geometry::{Position, Rect};
use serde::Serialize;

/// Why a cut was taken from its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CutKind {
    /// Width trimmed back to a stud.
    Vertical,
    /// Height trimmed down to the row height.
    Horizontal,
    /// Footprint overlapping a door.
    Door,
    /// Footprint overlapping a window.
    Window,
}

impl std::fmt::Display for CutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutKind::Vertical => write!(f, "vertical"),
            CutKind::Horizontal => write!(f, "horizontal"),
            CutKind::Door => write!(f, "door"),
            CutKind::Window => write!(f, "window"),
        }
    }
}

/// A rectangular remainder removed from a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cut {
    pub id: CutId,
    /// Panel the cut was taken from.
    pub panel: PanelId,
    /// Catalog name of the sheet it ultimately came from.
    pub stock_name: String,
    /// Wall it was produced on.
    pub wall: String,
    pub kind: CutKind,
    /// Lower-left corner where the cut was taken.
    pub position: Position,
    pub width: f64,
    pub height: f64,
    /// How many times the material has been re-cut.
    pub cut_count: u32,
}

impl Cut {
    /// Area of the cut.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Footprint of the cut where it was taken.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.width, self.height)
    }
}
