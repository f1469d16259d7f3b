#![forbid(unsafe_code)]

//! Render-side shapes for popovers: the arrowed outline and the dimming
//! overlay with its highlight cutout.
//!
//! Shapes are built as [`kurbo::BezPath`]s in the caller's coordinate space so
//! any 2D backend can fill or clip with them.

pub mod outline;
pub mod overlay;

pub use outline::{Outline, build_outline};
pub use overlay::{Cutout, OverlayDescriptor, OverlayFill, TapOutcome, build_overlay};

use perch_core::geometry::{Point, Rect};

pub(crate) fn to_kurbo_point(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

pub(crate) fn to_kurbo_rect(r: Rect) -> kurbo::Rect {
    kurbo::Rect::new(r.min_x(), r.min_y(), r.max_x(), r.max_y())
}

pub(crate) fn from_kurbo_rect(r: kurbo::Rect) -> Rect {
    Rect::new(r.x0, r.y0, r.width(), r.height())
}
