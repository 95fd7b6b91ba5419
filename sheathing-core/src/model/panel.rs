//! Placed sheets.

use super::{Cut, CutId, CutKind, PanelId};
use crate::geometry::{Position, Rect};
use serde::Serialize;

/// A sheet placed (or being placed) on a wall.
///
/// Width and height start at the source dimensions and shrink as trims are
/// attached; once committed to a wall the panel is no longer mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub id: PanelId,
    /// Catalog name of the source sheet.
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Lower-left corner on the wall.
    pub position: Position,
    /// Every cut taken from this panel, in the order taken.
    pub cuts: Vec<Cut>,
    pub vertical_cut: Option<CutId>,
    pub horizontal_cut: Option<CutId>,
    pub door_clip: Option<CutId>,
    pub window_clip: Option<CutId>,
    pub cut_count: u32,
    /// Offcut this panel was made from, if any.
    pub reused_from: Option<CutId>,
}

impl Panel {
    /// Create a panel of the given source dimensions at `position`.
    pub fn new(
        id: PanelId,
        name: impl Into<String>,
        width: f64,
        height: f64,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            width: width.max(0.0),
            height: height.max(0.0),
            position,
            cuts: Vec::new(),
            vertical_cut: None,
            horizontal_cut: None,
            door_clip: None,
            window_clip: None,
            cut_count: 0,
            reused_from: None,
        }
    }

    /// Attach a cut if its area is positive.
    ///
    /// The first cut of each kind fills the matching slot. Returns whether
    /// the cut was attached.
    pub fn attach_cut(&mut self, cut: Cut) -> bool {
        if cut.width <= 0.0 || cut.height <= 0.0 {
            return false;
        }

        let slot = match cut.kind {
            CutKind::Vertical => &mut self.vertical_cut,
            CutKind::Horizontal => &mut self.horizontal_cut,
            CutKind::Door => &mut self.door_clip,
            CutKind::Window => &mut self.window_clip,
        };
        slot.get_or_insert(cut.id);

        self.cuts.push(cut);
        true
    }

    /// Shrink the panel to its placed dimensions.
    pub fn trim_to(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Footprint on the wall.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.width, self.height)
    }

    /// Right edge X coordinate.
    pub fn x_max(&self) -> f64 {
        self.rect().x_max()
    }

    /// Total area of the cuts taken from this panel.
    pub fn cut_area(&self) -> f64 {
        self.cuts.iter().map(Cut::area).sum()
    }
}
