//! Geometry kernel: rounded positions, rectangles and opening clipping.

mod clip;
mod position;

pub use clip::{clip_intersection, rectangle_corners, Rect};
pub use position::{Position, PositionKey};
