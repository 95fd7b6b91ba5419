//! Tabular ledgers handed to the reporting layer.

use crate::config::{round4, ReuseStrategy};
use crate::model::{Cut, CutId, CutKind, Panel, PanelId, Wall, WasteStatus};
use serde::Serialize;

/// One placed panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRecord {
    pub trial: u32,
    pub wall: String,
    pub panel_id: PanelId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vertical_cut: Option<CutId>,
    pub horizontal_cut: Option<CutId>,
    pub door_clip: Option<CutId>,
    pub window_clip: Option<CutId>,
    pub cut_count: u32,
    pub reused_from: Option<CutId>,
}

impl PlacementRecord {
    pub fn new(trial: u32, wall: &str, panel: &Panel) -> Self {
        Self {
            trial,
            wall: wall.to_string(),
            panel_id: panel.id,
            name: panel.name.clone(),
            x: panel.position.x(),
            y: panel.position.y(),
            width: panel.width,
            height: panel.height,
            vertical_cut: panel.vertical_cut,
            horizontal_cut: panel.horizontal_cut,
            door_clip: panel.door_clip,
            window_clip: panel.window_clip,
            cut_count: panel.cut_count,
            reused_from: panel.reused_from,
        }
    }
}

/// One offcut, pending or consumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteRecord {
    pub trial: u32,
    /// Wall the offcut was produced on.
    pub wall: String,
    pub cut_id: CutId,
    pub panel_id: PanelId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub kind: CutKind,
    pub cut_count: u32,
    pub status: WasteStatus,
}

impl WasteRecord {
    pub fn new(trial: u32, cut: &Cut, status: WasteStatus) -> Self {
        Self {
            trial,
            wall: cut.wall.clone(),
            cut_id: cut.id,
            panel_id: cut.panel,
            x: cut.position.x(),
            y: cut.position.y(),
            width: cut.width,
            height: cut.height,
            area: cut.area(),
            kind: cut.kind,
            cut_count: cut.cut_count,
            status,
        }
    }
}

/// One seam in a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointRecord {
    pub trial: u32,
    pub wall: String,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub row_height: f64,
}

/// How a wall ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WallOutcome {
    /// Every row was covered.
    Completed,
    /// A row ran out of candidates; later rows were skipped.
    Stalled,
    /// Restarts were exhausted; the wall was left empty.
    Abandoned,
}

/// Per-wall totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallSummary {
    pub trial: u32,
    pub wall: String,
    pub level: Option<String>,
    pub panels: usize,
    pub covered_area: f64,
    /// Area of every cut recorded on this wall.
    pub total_waste_area: f64,
    /// Area still pending at the end of the wall.
    pub remaining_waste_area: f64,
    pub restarts: u32,
    pub rows_completed: usize,
    pub outcome: WallOutcome,
}

impl WallSummary {
    pub fn completed(&self) -> bool {
        self.outcome == WallOutcome::Completed
    }
}

/// Everything recorded for one wall in one trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallReport {
    pub summary: WallSummary,
    pub placements: Vec<PlacementRecord>,
    pub waste: Vec<WasteRecord>,
    pub joints: Vec<JointRecord>,
}

impl WallReport {
    /// Collect the ledgers of a finished wall.
    ///
    /// Pending waste is listed if it was produced on this wall; consumed
    /// waste is listed wherever it was consumed.
    pub fn collect(
        trial: u32,
        wall: &Wall,
        rows: &[f64],
        restarts: u32,
        rows_completed: usize,
        outcome: WallOutcome,
    ) -> Self {
        let placements = wall
            .placements()
            .iter()
            .map(|p| PlacementRecord::new(trial, &wall.name, p))
            .collect();

        let waste = wall
            .waste()
            .pending()
            .filter(|c| c.wall == wall.name)
            .map(|c| WasteRecord::new(trial, c, WasteStatus::Pending))
            .chain(
                wall.waste()
                    .consumed()
                    .iter()
                    .map(|c| WasteRecord::new(trial, c, WasteStatus::Consumed)),
            )
            .collect();

        let mut joints = Vec::new();
        for (row, xs) in wall.joint_rows() {
            let Some(&row_height) = rows.get(row) else {
                continue;
            };
            let y = round4(rows[..row].iter().sum());
            joints.extend(xs.iter().map(|&x| JointRecord {
                trial,
                wall: wall.name.clone(),
                row,
                x,
                y,
                row_height,
            }));
        }

        let summary = WallSummary {
            trial,
            wall: wall.name.clone(),
            level: wall.level.clone(),
            panels: wall.placements().len(),
            covered_area: round4(wall.covered_area()),
            total_waste_area: round4(wall.recorded_area()),
            remaining_waste_area: round4(wall.waste().pending_area()),
            restarts,
            rows_completed,
            outcome,
        };

        Self {
            summary,
            placements,
            waste,
            joints,
        }
    }
}

/// One trial over every wall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialReport {
    pub trial: u32,
    pub seed: u64,
    pub walls: Vec<WallReport>,
}

impl TrialReport {
    /// Waste recorded across all walls of the trial.
    pub fn total_waste_area(&self) -> f64 {
        round4(self.walls.iter().map(|w| w.summary.total_waste_area).sum())
    }

    pub fn panel_count(&self) -> usize {
        self.walls.iter().map(|w| w.summary.panels).sum()
    }
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub strategy: ReuseStrategy,
    pub base_seed: u64,
    pub trials: Vec<TrialReport>,
}

impl SimulationReport {
    /// Wall summaries of every trial, in order.
    pub fn summaries(&self) -> Vec<&WallSummary> {
        self.trials
            .iter()
            .flat_map(|t| t.walls.iter().map(|w| &w.summary))
            .collect()
    }

    /// Mean recorded waste per trial.
    pub fn mean_waste_area(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trials.iter().map(TrialReport::total_waste_area).sum();
        round4(total / self.trials.len() as f64)
    }
}
