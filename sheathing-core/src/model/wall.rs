//! Wall geometry, placement ledger, joint registry and waste ledger.

use super::{Cut, CutId, Panel, PanelId, WasteLedger};
use crate::config::float_cmp::at_most;
use crate::config::{round4, EPS};
use crate::geometry::{Position, PositionKey, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opening rectangle as given in a job file: any two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningSpec {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl OpeningSpec {
    /// Corners ordered as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.start_x.min(self.end_x),
            self.start_y.min(self.end_y),
            self.start_x.max(self.end_x),
            self.start_y.max(self.end_y),
        )
    }

    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }
}

/// Wall description as given in a job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub name: String,
    /// Floor the wall belongs to.
    #[serde(default)]
    pub level: Option<String>,
    pub length: f64,
    pub height: f64,
    pub studs: Vec<f64>,
    #[serde(default)]
    pub doors: Vec<OpeningSpec>,
    #[serde(default)]
    pub windows: Vec<OpeningSpec>,
}

impl WallSpec {
    pub fn new(name: impl Into<String>, length: f64, height: f64, studs: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            level: None,
            length,
            height,
            studs,
            doors: Vec::new(),
            windows: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_door(mut self, door: OpeningSpec) -> Self {
        self.doors.push(door);
        self
    }

    pub fn with_window(mut self, window: OpeningSpec) -> Self {
        self.windows.push(window);
        self
    }
}

/// Kind of opening in a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningKind {
    Door,
    Window,
}

/// A door or window cut-out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Opening {
    pub kind: OpeningKind,
    pub rect: Rect,
}

impl Opening {
    pub fn from_spec(kind: OpeningKind, spec: &OpeningSpec) -> Self {
        Self {
            kind,
            rect: Rect::from_corners(
                Position::new(spec.start_x, spec.start_y),
                Position::new(spec.end_x, spec.end_y),
            ),
        }
    }

    pub fn start_x(&self) -> f64 {
        self.rect.origin.x()
    }

    pub fn end_x(&self) -> f64 {
        self.rect.x_max()
    }

    pub fn start_y(&self) -> f64 {
        self.rect.origin.y()
    }

    pub fn end_y(&self) -> f64 {
        self.rect.y_max()
    }
}

/// Ledger entry for an occupied position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footprint {
    pub panel: PanelId,
    pub width: f64,
    pub height: f64,
    pub cuts: Vec<CutId>,
}

/// A wall being sheathed.
#[derive(Debug, Clone)]
pub struct Wall {
    pub name: String,
    pub level: Option<String>,
    pub length: f64,
    pub height: f64,
    studs: Vec<f64>,
    openings: Vec<Opening>,
    ledger: BTreeMap<PositionKey, Footprint>,
    panels: Vec<Panel>,
    joints: BTreeMap<usize, Vec<f64>>,
    waste: WasteLedger,
    recorded_area: f64,
}

impl Wall {
    /// Build a wall from its description.
    ///
    /// Studs outside `[0, length]` are dropped; the rest are sorted and
    /// deduplicated. Geometry is not otherwise checked here.
    pub fn new(spec: &WallSpec) -> Self {
        let length = round4(spec.length);
        let mut studs: Vec<f64> = spec
            .studs
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .map(round4)
            .filter(|&s| s >= 0.0 && at_most(s, length))
            .collect();
        studs.sort_by(|a, b| a.total_cmp(b));
        studs.dedup();

        let openings = spec
            .doors
            .iter()
            .map(|d| Opening::from_spec(OpeningKind::Door, d))
            .chain(
                spec.windows
                    .iter()
                    .map(|w| Opening::from_spec(OpeningKind::Window, w)),
            )
            .collect();

        Self {
            name: spec.name.clone(),
            level: spec.level.clone(),
            length,
            height: round4(spec.height),
            studs,
            openings,
            ledger: BTreeMap::new(),
            panels: Vec::new(),
            joints: BTreeMap::new(),
            waste: WasteLedger::new(),
            recorded_area: 0.0,
        }
    }

    /// Sorted stud x-locations.
    pub fn studs(&self) -> &[f64] {
        &self.studs
    }

    /// Doors followed by windows.
    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    pub fn doors(&self) -> impl Iterator<Item = &Opening> + '_ {
        self.openings.iter().filter(|o| o.kind == OpeningKind::Door)
    }

    pub fn windows(&self) -> impl Iterator<Item = &Opening> + '_ {
        self.openings
            .iter()
            .filter(|o| o.kind == OpeningKind::Window)
    }

    /// Half-open bounds test: the far edges are outside.
    pub fn is_inside(&self, pos: Position) -> bool {
        pos.x() >= 0.0 && pos.x() < self.length && pos.y() >= 0.0 && pos.y() < self.height
    }

    /// Heights of the rows covering the wall, bottom first.
    pub fn row_heights(&self, nominal: f64) -> Vec<f64> {
        if nominal <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }
        let full = ((self.height + EPS) / nominal).floor() as usize;
        let mut rows = vec![nominal; full];
        let remainder = round4(self.height - full as f64 * nominal);
        if remainder > EPS {
            rows.push(remainder);
        }
        rows
    }

    /// Record a panel in the placement ledger.
    ///
    /// The first panel at a position wins; later ones are ignored and
    /// `false` is returned.
    pub fn place(&mut self, panel: Panel) -> bool {
        let key = panel.position.key();
        if self.ledger.contains_key(&key) {
            return false;
        }
        self.ledger.insert(
            key,
            Footprint {
                panel: panel.id,
                width: panel.width,
                height: panel.height,
                cuts: panel.cuts.iter().map(|c| c.id).collect(),
            },
        );
        self.panels.push(panel);
        true
    }

    /// Whether a panel already occupies `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.ledger.contains_key(&pos.key())
    }

    /// Add a cut taken from fresh stock to the waste ledger and the running
    /// waste area.
    pub fn record_waste(&mut self, cut: Cut) -> bool {
        let area = cut.area();
        if self.waste.record(cut) {
            self.recorded_area += area;
            true
        } else {
            false
        }
    }

    /// Add a remnant of an offcut to the waste ledger.
    ///
    /// Its area was counted when the parent offcut was cut from stock, so the
    /// running waste area is left alone.
    pub fn add_offcut(&mut self, cut: Cut) -> bool {
        self.waste.record(cut)
    }

    /// Take a pending cut out of the waste ledger.
    pub fn consume_waste(&mut self, id: CutId) -> Option<Cut> {
        self.waste.consume(id)
    }

    /// Joints recorded for a row.
    pub fn joints(&self, row: usize) -> &[f64] {
        self.joints.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_joints(&mut self, row: usize, joints: Vec<f64>) {
        self.joints.insert(row, joints);
    }

    /// All rows with recorded joints.
    pub fn joint_rows(&self) -> impl Iterator<Item = (usize, &[f64])> + '_ {
        self.joints.iter().map(|(row, xs)| (*row, xs.as_slice()))
    }

    /// Panels in placement order.
    pub fn placements(&self) -> &[Panel] {
        &self.panels
    }

    /// Ledger entry at `pos`, if any.
    pub fn footprint_at(&self, pos: Position) -> Option<&Footprint> {
        self.ledger.get(&pos.key())
    }

    /// Sum of placed footprint areas (opening clips included).
    pub fn covered_area(&self) -> f64 {
        self.ledger.values().map(|f| f.width * f.height).sum()
    }

    pub fn waste(&self) -> &WasteLedger {
        &self.waste
    }

    /// Replace the waste ledger, e.g. with waste carried from another wall.
    pub fn set_waste(&mut self, waste: WasteLedger) {
        self.waste = waste;
    }

    /// Area of every cut taken from fresh stock on this wall.
    pub fn recorded_area(&self) -> f64 {
        self.recorded_area
    }
}
