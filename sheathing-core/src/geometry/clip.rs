//! Rectangle footprints and polygon clipping against openings.
//!
//! Clipping is delegated to `i_overlay`, which snaps float contours onto an
//! integer grid, runs the boolean operation there and maps the result back.

use super::Position;
use crate::config::round4;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use serde::Serialize;

/// Axis-aligned rectangle anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Lower-left corner.
    pub origin: Position,
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle; dimensions are rounded.
    pub fn new(origin: Position, width: f64, height: f64) -> Self {
        Self {
            origin,
            width: round4(width),
            height: round4(height),
        }
    }

    /// Rectangle spanning two opposite corners.
    pub fn from_corners(a: Position, b: Position) -> Self {
        let origin = Position::new(a.x().min(b.x()), a.y().min(b.y()));
        Self::new(
            origin,
            (a.x() - b.x()).abs(),
            (a.y() - b.y()).abs(),
        )
    }

    /// Right edge X coordinate.
    pub fn x_max(&self) -> f64 {
        round4(self.origin.x() + self.width)
    }

    /// Top edge Y coordinate.
    pub fn y_max(&self) -> f64 {
        round4(self.origin.y() + self.height)
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether the rectangle encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Corners in counter-clockwise order starting at the origin.
    pub fn corners(&self) -> [Position; 4] {
        rectangle_corners(self.origin, self.width, self.height)
    }

    /// Intersection with another rectangle, if it has positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if self.is_degenerate() || other.is_degenerate() {
            return None;
        }

        let polygons = clip_intersection(&self.corners(), &other.corners());
        let contour = polygons.first()?;
        let bounds = bounding_rect(contour)?;

        if bounds.is_degenerate() {
            None
        } else {
            Some(bounds)
        }
    }
}

/// Axis-aligned corners of a rectangle: origin, right, top-right, top.
pub fn rectangle_corners(origin: Position, width: f64, height: f64) -> [Position; 4] {
    let c1 = origin;
    let c2 = origin.translate(width, 0.0);
    let c3 = c2.translate(0.0, height);
    let c4 = c1.translate(0.0, height);
    [c1, c2, c3, c4]
}

/// Intersect two polygons, returning the outer contour of each result shape.
///
/// Returns an empty list when the polygons are disjoint or only touch.
pub fn clip_intersection(subject: &[Position], clip: &[Position]) -> Vec<Vec<Position>> {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }

    let subject: Vec<Vec<[f64; 2]>> = vec![subject.iter().map(|p| [p.x(), p.y()]).collect()];
    let clip: Vec<[f64; 2]> = clip.iter().map(|p| [p.x(), p.y()]).collect();

    let shapes = subject.overlay(&[clip], OverlayRule::Intersect, FillRule::NonZero);

    let mut result = Vec::new();
    for shape in shapes {
        // First contour of a shape is its outer boundary; the rest are holes.
        if let Some(contour) = shape.into_iter().next() {
            if contour.len() >= 3 {
                result.push(
                    contour
                        .into_iter()
                        .map(|[x, y]| Position::new(x, y))
                        .collect(),
                );
            }
        }
    }
    result
}

/// Bounding rectangle of a contour.
fn bounding_rect(contour: &[Position]) -> Option<Rect> {
    let first = contour.first()?;
    let (mut min_x, mut min_y) = (first.x(), first.y());
    let (mut max_x, mut max_y) = (min_x, min_y);

    for p in &contour[1..] {
        min_x = min_x.min(p.x());
        min_y = min_y.min(p.y());
        max_x = max_x.max(p.x());
        max_y = max_y.max(p.y());
    }

    Some(Rect::new(
        Position::new(min_x, min_y),
        max_x - min_x,
        max_y - min_y,
    ))
}
