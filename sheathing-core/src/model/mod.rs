//! Data model: stock catalog, panels, cuts, walls and the waste ledger.

mod catalog;
mod cut;
mod ids;
mod panel;
mod wall;
mod waste;

pub use catalog::{Catalog, StockPanel};
pub use cut::{Cut, CutKind};
pub use ids::{CutId, IdAllocator, PanelId};
pub use panel::Panel;
pub use wall::{Footprint, Opening, OpeningKind, OpeningSpec, Wall, WallSpec};
pub use waste::{WasteLedger, WasteStatus};
