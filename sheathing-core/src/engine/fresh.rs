//! Fresh stock sheets: row placement and the single vertical sheet layout.

use super::{Candidate, Engine, Fit, StepOutcome, Sweep, Trim};
use crate::config::round4;
use crate::geometry::Position;
use crate::model::{CutKind, PanelId, StockPanel, Wall};
use crate::rules::landing_stud;
use tracing::debug;

impl Engine {
    /// Try a fresh stock sheet at the cursor.
    pub fn place_fresh(&mut self, wall: &mut Wall, sweep: &mut Sweep, stock: &StockPanel) -> StepOutcome {
        if self.row_done(wall, sweep) {
            return self.finish_row(wall, sweep);
        }

        let candidate = Candidate::fresh(stock);
        match self.fit(wall, sweep, candidate.width) {
            Fit::Land(landing) => self.commit(wall, sweep, &candidate, landing),
            Fit::Reject(rejection) => {
                debug!(wall = %wall.name, row = sweep.row, sheet = %stock.name, %rejection, "fresh sheet rejected");
                StepOutcome::Rejected(rejection)
            }
            Fit::RowDone => self.finish_row(wall, sweep),
        }
    }

    /// Cover the whole wall with one sheet stood on end.
    ///
    /// The sheet's height runs along the wall; it is trimmed back to the last
    /// stud within reach and down to the wall height. Returns `None` when no
    /// stud beyond the origin is in reach or the wall is already occupied.
    pub fn place_vertical(&mut self, wall: &mut Wall, stock: &StockPanel) -> Option<PanelId> {
        let origin = Position::origin();
        if wall.is_occupied(origin) {
            return None;
        }

        let reach = round4(stock.height.min(wall.length));
        let stud = landing_stud(wall, reach, &self.tolerances).filter(|&s| s > 0.0)?;
        let width = round4(stud.min(reach));

        let candidate = Candidate {
            name: stock.name.clone(),
            width: round4(stock.height),
            height: round4(stock.width),
            cut_count: 0,
            reused_from: None,
        };
        let trims = [
            Trim {
                kind: CutKind::Vertical,
                position: Position::new(width, 0.0),
                width: round4(candidate.width - width),
                height: candidate.height,
            },
            Trim {
                kind: CutKind::Horizontal,
                position: Position::new(0.0, wall.height),
                width,
                height: round4(candidate.height - wall.height),
            },
        ];

        let height = wall.height;
        let id = self.assemble(wall, &candidate, origin, width, height, &trims);
        debug!(wall = %wall.name, panel = %id, width, "placed vertical sheet");
        Some(id)
    }
}
