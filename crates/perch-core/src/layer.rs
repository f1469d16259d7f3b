#![forbid(unsafe_code)]

//! Layer model: bounds, position, pivot, and uniform scale.
//!
//! A [`Layer`] mirrors how compositor-backed views store geometry: the
//! `position` is where the pivot (`anchor_point`, in unit coordinates of the
//! bounds) sits in the parent. The layout frame is derived from those values,
//! and the on-screen rectangle additionally applies `scale` around the pivot.
//!
//! # Invariants
//!
//! 1. `frame()` is independent of `scale`.
//! 2. [`Layer::set_anchor_point`] never moves `frame()`.
//! 3. At `scale == 1.0`, `rendered_rect() == frame()`.
//! 4. The pivot point itself never moves while scaling.

use crate::geometry::{Point, Rect, Size};

/// Geometry of a single view layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    bounds: Size,
    position: Point,
    anchor_point: Point,
    scale: f64,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl Layer {
    /// Pivot at the center of the bounds.
    pub const CENTER: Point = Point::new(0.5, 0.5);

    /// Create a layer occupying `frame` with a centered pivot and identity scale.
    pub fn new(frame: Rect) -> Self {
        Self {
            bounds: frame.size,
            position: frame.center(),
            anchor_point: Self::CENTER,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn anchor_point(&self) -> Point {
        self.anchor_point
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Layout frame in parent coordinates, ignoring scale.
    pub fn frame(&self) -> Rect {
        Rect::new(
            self.position.x - self.anchor_point.x * self.bounds.width,
            self.position.y - self.anchor_point.y * self.bounds.height,
            self.bounds.width,
            self.bounds.height,
        )
    }

    /// Replace the layout frame, keeping the current pivot.
    pub fn set_frame(&mut self, frame: Rect) {
        self.bounds = frame.size;
        self.position = Point::new(
            frame.origin.x + self.anchor_point.x * frame.size.width,
            frame.origin.y + self.anchor_point.y * frame.size.height,
        );
    }

    /// Move the pivot without moving the layer on screen.
    ///
    /// The position is shifted by the pivot delta times the bounds, so the
    /// layout frame is preserved. Meant to be called at identity scale.
    pub fn set_anchor_point(&mut self, anchor_point: Point) {
        let last = self.anchor_point;
        self.anchor_point = anchor_point;
        self.position = Point::new(
            self.position.x + (anchor_point.x - last.x) * self.bounds.width,
            self.position.y + (anchor_point.y - last.y) * self.bounds.height,
        );
    }

    /// Set the uniform scale applied around the pivot.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// The on-screen rectangle after scaling around the pivot.
    pub fn rendered_rect(&self) -> Rect {
        let width = self.bounds.width * self.scale;
        let height = self.bounds.height * self.scale;
        Rect::new(
            self.position.x - self.anchor_point.x * width,
            self.position.y - self.anchor_point.y * height,
            width,
            height,
        )
    }

    /// Convert a parent-space point into layer-local space (identity scale).
    pub fn to_local(&self, point: Point) -> Point {
        let frame = self.frame();
        Point::new(point.x - frame.origin.x, point.y - frame.origin.y)
    }

    /// Convert a layer-local point to where it is drawn in parent space.
    pub fn to_parent(&self, local: Point) -> Point {
        Point::new(
            self.position.x + (local.x - self.anchor_point.x * self.bounds.width) * self.scale,
            self.position.y + (local.y - self.anchor_point.y * self.bounds.height) * self.scale,
        )
    }
}
