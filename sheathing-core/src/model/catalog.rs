//! Stock sheet catalog.

use serde::{Deserialize, Serialize};

/// A nominal sheet size available for placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPanel {
    /// Catalog name, e.g. "4x8 OSB".
    pub name: String,
    /// Nominal width (ft).
    pub width: f64,
    /// Nominal height (ft).
    pub height: f64,
}

impl StockPanel {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Nominal area of the sheet.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Immutable, ordered list of stock sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    panels: Vec<StockPanel>,
}

impl Catalog {
    pub fn new(panels: Vec<StockPanel>) -> Self {
        Self { panels }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StockPanel> {
        self.panels.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StockPanel> {
        self.panels.iter()
    }

    /// First sheet that, stood on end, covers a whole wall.
    pub fn vertical_fit(&self, wall_length: f64, wall_height: f64) -> Option<&StockPanel> {
        self.panels
            .iter()
            .find(|p| wall_length <= p.height && wall_height <= p.width)
    }
}

impl From<Vec<StockPanel>> for Catalog {
    fn from(panels: Vec<StockPanel>) -> Self {
        Self::new(panels)
    }
}
