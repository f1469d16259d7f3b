#![forbid(unsafe_code)]

//! Popover outline: a rounded rectangle with a triangular arrow notch.
//!
//! Every direction is drawn by one rule in a canonical frame where the arrow
//! sits on the top edge: start at the apex, run the right leg, then the four
//! corner arcs clockwise, then the left leg back to the apex. The canonical
//! path is then rotated onto the requested edge, which keeps the traversal
//! clockwise for all directions.
//!
//! # Invariants
//!
//! 1. The path is closed and starts at the apex.
//! 2. For an apex on the arrow edge, the bounding box is the content size
//!    grown by the arrow height along the open axis.
//! 3. The corner radius is clamped to `[0, min(cross, body) / 2]`.
//! 4. A base vertex never enters a corner arc: when the apex sits at (or past)
//!    an outer edge, that side's base vertex moves onto the side edge at the
//!    corner-radius boundary and the corner arc is dropped.

use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Affine, Arc, BezPath, Shape, Vec2};
use perch_core::color::Rgba;
use perch_core::geometry::{Point, Rect, Size};
use perch_core::placement::Direction;

use crate::{from_kurbo_rect, to_kurbo_point};

/// Flattening tolerance used when emitting arcs as cubic segments.
const ARC_TOLERANCE: f64 = 0.1;

/// Closed popover outline, usable both as a fill/mask and as a hit region.
#[derive(Debug, Clone)]
pub struct Outline {
    path: BezPath,
    direction: Direction,
    size: Size,
    apex: Point,
    fill: Rgba,
}

impl Outline {
    /// The outline path in content-local coordinates.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Direction the outline was built for.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Size including the arrow strip.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Arrow tip in content-local coordinates.
    pub fn apex(&self) -> Point {
        self.apex
    }

    /// Background fill painted through the outline.
    pub fn fill(&self) -> Rgba {
        self.fill
    }

    /// Set the background fill.
    #[must_use]
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    /// Tight bounding box of the path.
    pub fn bounding_box(&self) -> Rect {
        from_kurbo_rect(self.path.bounding_box())
    }

    /// Hit test with the non-zero winding rule.
    pub fn contains(&self, point: Point) -> bool {
        self.path.contains(to_kurbo_point(point))
    }

    /// SVG path data, handy for snapshots and debugging.
    pub fn to_svg(&self) -> String {
        self.path.to_svg()
    }
}

/// Build the outline for `content_size` (before arrow expansion).
///
/// `apex` is the arrow tip in content-local coordinates of the expanded
/// content, as produced by placement. `Auto` is drawn as `Down`.
pub fn build_outline(
    content_size: Size,
    direction: Direction,
    arrow_size: Size,
    corner_radius: f64,
    apex: Point,
) -> Outline {
    let arrow_height = arrow_size.height.max(0.0);
    let open = direction.axis();
    let size = content_size.grown(open, arrow_height);
    let cross = content_size.along(open.cross());
    let along = size.along(open);

    // Apex position along the cross axis, in canonical coordinates.
    let tip = match direction {
        Direction::Down | Direction::Auto => apex.x,
        Direction::Up => cross - apex.x,
        Direction::Left => apex.y,
        Direction::Right => cross - apex.y,
    };

    let canonical = Notch {
        cross,
        along,
        arrow_height,
        half_base: arrow_size.width.max(0.0) * 0.5,
        radius: corner_radius
            .max(0.0)
            .min(cross * 0.5)
            .min((along - arrow_height).max(0.0) * 0.5),
        tip,
    };
    let mut path = canonical.path();
    path.apply_affine(canonical_to_local(direction, cross, along));

    perch_core::trace!(
        ?direction,
        width = size.width,
        height = size.height,
        radius = canonical.radius,
        "built popover outline"
    );

    Outline {
        path,
        direction,
        size,
        apex,
        fill: Rgba::WHITE,
    }
}

/// Map the canonical arrow-on-top frame onto the requested edge.
fn canonical_to_local(direction: Direction, cross: f64, along: f64) -> Affine {
    match direction {
        Direction::Down | Direction::Auto => Affine::IDENTITY,
        // (x, y) -> (cross - x, along - y)
        Direction::Up => Affine::new([-1.0, 0.0, 0.0, -1.0, cross, along]),
        // (x, y) -> (along - y, x)
        Direction::Left => Affine::new([0.0, 1.0, -1.0, 0.0, along, 0.0]),
        // (x, y) -> (y, cross - x)
        Direction::Right => Affine::new([0.0, -1.0, 1.0, 0.0, 0.0, cross]),
    }
}

/// Outline in the canonical frame: arrow on the top edge, `x` across,
/// `y` from the apex (0) to the far edge (`along`).
#[derive(Debug, Clone, Copy)]
struct Notch {
    cross: f64,
    along: f64,
    arrow_height: f64,
    half_base: f64,
    radius: f64,
    tip: f64,
}

impl Notch {
    fn path(&self) -> BezPath {
        let Notch {
            cross,
            along,
            arrow_height: top,
            half_base,
            radius: r,
            tip,
        } = *self;
        let corner_left = tip <= 0.0;
        let corner_right = tip >= cross;
        let base = |x: f64| x.clamp(r, (cross - r).max(r));

        let mut path = BezPath::new();
        path.move_to((tip, 0.0));

        if corner_right {
            path.line_to((cross, top + r));
        } else {
            path.line_to((base(tip + half_base), top));
            path.line_to((cross - r, top));
            self.corner(&mut path, (cross - r, top + r), -FRAC_PI_2);
        }

        path.line_to((cross, along - r));
        self.corner(&mut path, (cross - r, along - r), 0.0);

        path.line_to((r, along));
        self.corner(&mut path, (r, along - r), FRAC_PI_2);

        path.line_to((0.0, top + r));
        if !corner_left {
            self.corner(&mut path, (r, top + r), PI);
            path.line_to((base(tip - half_base), top));
        }

        path.close_path();
        path
    }

    /// Append a clockwise quarter arc starting at `start_angle`.
    fn corner(&self, path: &mut BezPath, center: (f64, f64), start_angle: f64) {
        if self.radius <= 0.0 {
            return;
        }
        let arc = Arc {
            center: center.into(),
            radii: Vec2::new(self.radius, self.radius),
            start_angle,
            sweep_angle: FRAC_PI_2,
            x_rotation: 0.0,
        };
        path.extend(arc.append_iter(ARC_TOLERANCE));
    }
}
