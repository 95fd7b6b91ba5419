//! Waste ledger: pending offcuts available for reuse plus consumed history.

use super::{Cut, CutId, PanelId};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

/// Area quantized to 10^-8 so it can be ordered exactly.
fn area_key(area: f64) -> i64 {
    (area * 1e8).round() as i64
}

/// Whether a waste entry is still available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteStatus {
    Pending,
    Consumed,
}

/// Pending offcuts indexed by descending area, and the cuts already consumed.
#[derive(Debug, Clone, Default)]
pub struct WasteLedger {
    pending: BTreeMap<CutId, Cut>,
    by_area: BTreeSet<(Reverse<i64>, CutId)>,
    consumed: Vec<Cut>,
}

impl WasteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cut to the pending set. Cuts without positive area are dropped.
    pub fn record(&mut self, cut: Cut) -> bool {
        if cut.width <= 0.0 || cut.height <= 0.0 || self.pending.contains_key(&cut.id) {
            return false;
        }
        self.by_area.insert((Reverse(area_key(cut.area())), cut.id));
        self.pending.insert(cut.id, cut);
        true
    }

    /// Remove a pending cut and move it to the consumed history.
    pub fn consume(&mut self, id: CutId) -> Option<Cut> {
        let cut = self.pending.remove(&id)?;
        self.by_area.remove(&(Reverse(area_key(cut.area())), id));
        self.consumed.push(cut.clone());
        Some(cut)
    }

    /// Look up a pending cut.
    pub fn get(&self, id: CutId) -> Option<&Cut> {
        self.pending.get(&id)
    }

    /// Pending cuts, largest area first. Equal areas keep recording order.
    pub fn candidates_by_area(&self) -> impl Iterator<Item = &Cut> + '_ {
        self.by_area
            .iter()
            .filter_map(move |(_, id)| self.pending.get(id))
    }

    /// Pending cuts taken from `panel`.
    pub fn offcuts_from(&self, panel: PanelId) -> impl Iterator<Item = &Cut> + '_ {
        self.pending.values().filter(move |c| c.panel == panel)
    }

    /// Consumed cuts in the order they were used.
    pub fn consumed(&self) -> &[Cut] {
        &self.consumed
    }

    /// Pending cuts in id order.
    pub fn pending(&self) -> impl Iterator<Item = &Cut> + '_ {
        self.pending.values()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total area still available for reuse.
    pub fn pending_area(&self) -> f64 {
        self.pending.values().map(Cut::area).sum()
    }

    /// A ledger holding the same pending cuts and no history.
    pub fn carry_over(&self) -> Self {
        Self {
            pending: self.pending.clone(),
            by_area: self.by_area.clone(),
            consumed: Vec::new(),
        }
    }
}
