//! Placement engine.
//!
//! A [`Sweep`] walks a cursor along one row of a wall. Each call into the
//! engine tries one candidate (a fresh stock sheet or a pending offcut) at
//! the cursor and either commits a panel, rejects the candidate, or ends the
//! row.

mod fresh;
mod reuse;

use crate::config::float_cmp::past;
use crate::config::{round4, RuleTolerances, ROW_DONE_STEP};
use crate::geometry::Position;
use crate::model::{Cut, CutId, CutKind, IdAllocator, OpeningKind, Panel, PanelId, StockPanel, Wall};
use crate::rules::{check_seam, landing_stud, on_stud, Rejection};
use tracing::{debug, warn};

/// Cursor state for the row being covered.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub row: usize,
    /// Bottom of the row.
    pub y: f64,
    pub row_height: f64,
    pub cursor: Position,
    /// Seams created in this row so far.
    pub joints: Vec<f64>,
}

impl Sweep {
    /// Start a row with the cursor at its left end.
    pub fn new(row: usize, y: f64, row_height: f64) -> Self {
        Self {
            row,
            y: round4(y),
            row_height: round4(row_height),
            cursor: Position::new(0.0, y),
            joints: Vec::new(),
        }
    }
}

/// Result of one placement attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// A panel was committed and the cursor advanced.
    Placed(PanelId),
    /// The candidate broke a rule; the cursor did not move.
    Rejected(Rejection),
    /// The row is finished; the cursor is past the far edge.
    RowDone,
}

impl StepOutcome {
    /// Whether the step moved the sweep forward.
    pub fn is_progress(&self) -> bool {
        !matches!(self, StepOutcome::Rejected(_))
    }
}

/// Material about to be placed.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    name: String,
    width: f64,
    height: f64,
    cut_count: u32,
    reused_from: Option<CutId>,
}

impl Candidate {
    pub(crate) fn fresh(stock: &StockPanel) -> Self {
        Self {
            name: stock.name.clone(),
            width: round4(stock.width),
            height: round4(stock.height),
            cut_count: 0,
            reused_from: None,
        }
    }

    pub(crate) fn offcut(cut: &Cut) -> Self {
        Self {
            name: cut.stock_name.clone(),
            width: cut.width,
            height: cut.height,
            cut_count: cut.cut_count + 1,
            reused_from: Some(cut.id),
        }
    }
}

/// Where a candidate lands once trimmed back to a stud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Landing {
    /// Placed width.
    width: f64,
    /// Width of the vertical cut taken off the right side.
    vc_width: f64,
    /// Cursor after the placement.
    next_cursor: Position,
    /// Seam recorded for the stagger rule.
    joint: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Fit {
    Land(Landing),
    Reject(Rejection),
    RowDone,
}

/// A rectangular trim taken from a candidate before placement.
#[derive(Debug, Clone, Copy)]
struct Trim {
    kind: CutKind,
    position: Position,
    width: f64,
    height: f64,
}

/// Places panels on walls and tracks panel and cut ids for a trial.
#[derive(Debug, Clone)]
pub struct Engine {
    tolerances: RuleTolerances,
    ids: IdAllocator,
}

impl Engine {
    pub fn new(tolerances: RuleTolerances) -> Self {
        Self {
            tolerances,
            ids: IdAllocator::new(),
        }
    }

    /// Whether the cursor has left the wall, counting the last
    /// `wall_edge_margin` of the row as outside.
    pub fn row_done(&self, wall: &Wall, sweep: &Sweep) -> bool {
        let ahead = sweep.cursor.translate(self.tolerances.wall_edge_margin, 0.0);
        !wall.is_inside(ahead)
    }

    /// Push the cursor past the far edge and end the row.
    pub(crate) fn finish_row(&self, wall: &Wall, sweep: &mut Sweep) -> StepOutcome {
        let x = sweep.cursor.x().max(wall.length) + ROW_DONE_STEP;
        sweep.cursor = Position::new(x, sweep.y);
        StepOutcome::RowDone
    }

    /// Work out where a candidate of `width` lands from the current cursor.
    pub(crate) fn fit(&self, wall: &Wall, sweep: &Sweep, width: f64) -> Fit {
        let tol = &self.tolerances;
        let cursor = sweep.cursor;

        if wall.is_occupied(cursor) {
            return Fit::Reject(Rejection::Occupied);
        }

        let next = cursor.translate(width, 0.0);

        // Overruns the wall: trim back to the last stud.
        if next.x() >= wall.length {
            let Some(stud) = landing_stud(wall, next.x(), tol) else {
                return Fit::RowDone;
            };
            let vc_width = round4((next.x() - stud).max(0.0));
            let trimmed = round4(width - vc_width);
            if trimmed <= 0.0 {
                return Fit::RowDone;
            }
            return Fit::Land(Landing {
                width: trimmed,
                vc_width,
                next_cursor: next,
                joint: None,
            });
        }

        if on_stud(wall, next.x(), tol) {
            if let Err(rejection) =
                check_seam(wall, sweep.row, next.x(), sweep.y, sweep.row_height, tol)
            {
                return Fit::Reject(rejection);
            }
            return Fit::Land(Landing {
                width,
                vc_width: 0.0,
                next_cursor: next,
                joint: self.joint_at(wall, next.x()),
            });
        }

        let stud = match landing_stud(wall, next.x(), tol) {
            Some(s) if past(s, cursor.x()) => s,
            _ => return Fit::Reject(Rejection::NoStudInSpan),
        };
        if let Err(rejection) = check_seam(wall, sweep.row, stud, sweep.y, sweep.row_height, tol) {
            return Fit::Reject(rejection);
        }

        let vc_width = round4(next.x() - stud);
        Fit::Land(Landing {
            width: round4(width - vc_width),
            vc_width,
            next_cursor: Position::new(stud, sweep.y),
            joint: self.joint_at(wall, stud),
        })
    }

    fn joint_at(&self, wall: &Wall, x: f64) -> Option<f64> {
        (x < wall.length - self.tolerances.joint_edge_margin).then_some(x)
    }

    /// Trim the candidate, place it at the cursor and advance the sweep.
    pub(crate) fn commit(
        &mut self,
        wall: &mut Wall,
        sweep: &mut Sweep,
        candidate: &Candidate,
        landing: Landing,
    ) -> StepOutcome {
        let origin = sweep.cursor;
        let edge = origin.translate(landing.width, 0.0);
        let trims = [
            Trim {
                kind: CutKind::Vertical,
                position: edge,
                width: landing.vc_width,
                height: candidate.height,
            },
            Trim {
                kind: CutKind::Horizontal,
                position: origin.translate(0.0, sweep.row_height),
                width: landing.width,
                height: round4(candidate.height - sweep.row_height),
            },
        ];

        let id = self.assemble(
            wall,
            candidate,
            origin,
            landing.width,
            sweep.row_height,
            &trims,
        );

        debug!(
            wall = %wall.name,
            row = sweep.row,
            panel = %id,
            x = origin.x(),
            width = landing.width,
            vc = landing.vc_width,
            reused = candidate.reused_from.is_some(),
            "placed panel"
        );

        sweep.cursor = landing.next_cursor;
        if let Some(joint) = landing.joint {
            sweep.joints.push(joint);
        }
        StepOutcome::Placed(id)
    }

    /// Build a panel from `candidate`, attach its trims and opening clips,
    /// record the waste and place it on the wall.
    fn assemble(
        &mut self,
        wall: &mut Wall,
        candidate: &Candidate,
        origin: Position,
        width: f64,
        height: f64,
        trims: &[Trim],
    ) -> PanelId {
        let id = self.ids.next_panel();
        let mut panel = Panel::new(
            id,
            candidate.name.clone(),
            candidate.width,
            candidate.height,
            origin,
        );
        panel.cut_count = candidate.cut_count;
        panel.reused_from = candidate.reused_from;

        for trim in trims {
            if let Some(cut) = self.new_cut(&panel, wall, *trim) {
                panel.attach_cut(cut);
            }
        }
        panel.trim_to(width, height);

        let footprint = panel.rect();
        let clips: Vec<Trim> = wall
            .openings()
            .iter()
            .filter_map(|opening| {
                let clip = footprint.intersection(&opening.rect)?;
                let kind = match opening.kind {
                    OpeningKind::Door => CutKind::Door,
                    OpeningKind::Window => CutKind::Window,
                };
                Some(Trim {
                    kind,
                    position: clip.origin,
                    width: clip.width,
                    height: clip.height,
                })
            })
            .collect();
        for clip in clips {
            if let Some(cut) = self.new_cut(&panel, wall, clip) {
                panel.attach_cut(cut);
            }
        }

        let fresh = candidate.reused_from.is_none();
        for cut in &panel.cuts {
            if fresh {
                wall.record_waste(cut.clone());
            } else {
                wall.add_offcut(cut.clone());
            }
        }
        if !wall.place(panel) {
            warn!(wall = %wall.name, %origin, "position already occupied, panel dropped from ledger");
        }
        id
    }

    fn new_cut(&mut self, panel: &Panel, wall: &Wall, trim: Trim) -> Option<Cut> {
        if trim.width <= 0.0 || trim.height <= 0.0 {
            return None;
        }
        Some(Cut {
            id: self.ids.next_cut(),
            panel: panel.id,
            stock_name: panel.name.clone(),
            wall: wall.name.clone(),
            kind: trim.kind,
            position: trim.position,
            width: round4(trim.width),
            height: round4(trim.height),
            cut_count: panel.cut_count,
        })
    }
}
