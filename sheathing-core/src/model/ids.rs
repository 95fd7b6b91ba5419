//! Identifiers for panels and cuts.

use serde::Serialize;

/// Unique id of a placed panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PanelId(pub u32);

/// Unique id of a cut (offcut).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CutId(pub u32);

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl std::fmt::Display for CutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Monotonic id source shared by every wall of a trial.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_panel: u32,
    next_cut: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_panel(&mut self) -> PanelId {
        let id = PanelId(self.next_panel);
        self.next_panel += 1;
        id
    }

    pub fn next_cut(&mut self) -> CutId {
        let id = CutId(self.next_cut);
        self.next_cut += 1;
        id
    }
}
