//! Offcut reuse heuristics.
//!
//! Both heuristics scan the wall's pending waste largest-first and stop at
//! the first offcut that can be committed at the cursor. Offcuts that break
//! a rule are skipped, not consumed.

use super::{Candidate, Engine, Fit, StepOutcome, Sweep};
use crate::config::float_cmp::at_most;
use crate::config::{round4, ReuseLimits};
use crate::model::{Cut, Wall};
use crate::rules::on_stud;
use tracing::debug;

impl Engine {
    /// Whether an offcut meets the size and re-cut limits for this row.
    pub fn is_reusable(&self, cut: &Cut, sweep: &Sweep, limits: ReuseLimits) -> bool {
        at_most(sweep.row_height, cut.height)
            && cut.width > self.tolerances.min_buckle_width
            && cut.cut_count < limits.max_cuts
            && cut.width >= limits.min_width
    }

    fn reusable_offcuts(&self, wall: &Wall, sweep: &Sweep, limits: ReuseLimits) -> Vec<Cut> {
        wall.waste()
            .candidates_by_area()
            .filter(|cut| self.is_reusable(cut, sweep, limits))
            .cloned()
            .collect()
    }

    /// Place the largest usable offcut, trimming it back to a stud as needed.
    ///
    /// Returns `None` when no pending offcut can be placed at the cursor.
    pub fn reuse_greedy(
        &mut self,
        wall: &mut Wall,
        sweep: &mut Sweep,
        limits: ReuseLimits,
    ) -> Option<StepOutcome> {
        if self.row_done(wall, sweep) {
            return Some(self.finish_row(wall, sweep));
        }

        for offcut in self.reusable_offcuts(wall, sweep, limits) {
            match self.fit(wall, sweep, offcut.width) {
                Fit::Land(landing) => {
                    let offcut = wall.consume_waste(offcut.id)?;
                    debug!(wall = %wall.name, row = sweep.row, cut = %offcut.id, "greedy reuse");
                    return Some(self.commit(wall, sweep, &Candidate::offcut(&offcut), landing));
                }
                Fit::RowDone => return Some(self.finish_row(wall, sweep)),
                Fit::Reject(rejection) => {
                    debug!(wall = %wall.name, cut = %offcut.id, %rejection, "offcut rejected");
                }
            }
        }
        None
    }

    /// Place the largest usable offcut whose right edge lands on a stud.
    ///
    /// Only the height is trimmed; no vertical cut is produced.
    pub fn reuse_best_fit(
        &mut self,
        wall: &mut Wall,
        sweep: &mut Sweep,
        limits: ReuseLimits,
    ) -> Option<StepOutcome> {
        if self.row_done(wall, sweep) {
            return Some(self.finish_row(wall, sweep));
        }

        for offcut in self.reusable_offcuts(wall, sweep, limits) {
            let edge = round4(sweep.cursor.x() + offcut.width);
            if !at_most(edge, wall.length) || !on_stud(wall, edge, &self.tolerances) {
                continue;
            }

            match self.fit(wall, sweep, offcut.width) {
                Fit::Land(landing) if landing.vc_width <= 0.0 => {
                    let offcut = wall.consume_waste(offcut.id)?;
                    debug!(wall = %wall.name, row = sweep.row, cut = %offcut.id, edge, "best-fit reuse");
                    return Some(self.commit(wall, sweep, &Candidate::offcut(&offcut), landing));
                }
                Fit::Reject(rejection) => {
                    debug!(wall = %wall.name, cut = %offcut.id, %rejection, "offcut rejected");
                }
                _ => {}
            }
        }
        None
    }
}
