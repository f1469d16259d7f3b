#![forbid(unsafe_code)]

//! Placement engine: where a popover and its arrow sit relative to a trigger.
//!
//! The pipeline for an arrow popover is:
//!
//! 1. [`Direction::resolve`] turns `Auto` into `Up` or `Down` (once).
//! 2. [`arrow_anchor`] picks the midpoint of the trigger edge facing that
//!    direction, in host coordinates.
//! 3. [`compute_placement`] centers the popover on the anchor along the cross
//!    axis, clamps it into the host, butts it against the anchor along the
//!    open axis, moves the pivot onto the arrow tip, and grows the frame by the
//!    arrow height.
//!
//! # Invariants
//!
//! 1. A resolved direction is never `Auto`, and resolving twice is a no-op.
//! 2. When the popover fits the host along the cross axis, the clamped frame
//!    stays inside the host along that axis.
//! 3. The frame extent along the open axis is `content + arrow height`.
//! 4. [`Placement::apex_in_host`] equals the anchor at identity scale.
//! 5. The pivot lies in `[0, 1]` on both axes; a zero arrow pivots at the
//!    center.

use crate::geometry::{Axis, Insets, Point, Rect, Size};
use crate::layer::Layer;

/// Side of the trigger the popover opens toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Above the trigger; the arrow points down at it.
    Up,
    /// Below the trigger; the arrow points up at it.
    Down,
    /// Left of the trigger; the arrow points right.
    Left,
    /// Right of the trigger; the arrow points left.
    Right,
    /// `Up` or `Down`, whichever has room. Resolved before placement.
    #[default]
    Auto,
}

impl Direction {
    /// The axis the popover opens along.
    ///
    /// `Auto` behaves like `Down` until resolved.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down | Self::Auto => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Whether this is a concrete direction.
    #[inline]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Auto)
    }

    /// Replace `Auto` with a concrete direction. Concrete values are kept.
    ///
    /// Returns the (now concrete) direction.
    pub fn resolve(
        &mut self,
        trigger_frame: Rect,
        popover_height: f64,
        arrow_height: f64,
        host_bounds: Rect,
    ) -> Direction {
        if *self == Self::Auto {
            *self = resolve_auto_direction(trigger_frame, popover_height, arrow_height, host_bounds);
            crate::trace!(direction = ?*self, "resolved auto direction");
        }
        *self
    }
}

/// Choose `Up` when there is no room below the trigger, `Down` otherwise.
pub fn resolve_auto_direction(
    trigger_frame: Rect,
    popover_height: f64,
    arrow_height: f64,
    host_bounds: Rect,
) -> Direction {
    if trigger_frame.max_y() + arrow_height + popover_height > host_bounds.max_y() {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Midpoint of the trigger edge facing `direction`, in host coordinates.
pub fn arrow_anchor(trigger_frame: Rect, direction: Direction) -> Point {
    match direction {
        Direction::Up => Point::new(trigger_frame.mid_x(), trigger_frame.min_y()),
        Direction::Down | Direction::Auto => Point::new(trigger_frame.mid_x(), trigger_frame.max_y()),
        Direction::Left => Point::new(trigger_frame.min_x(), trigger_frame.mid_y()),
        Direction::Right => Point::new(trigger_frame.max_x(), trigger_frame.mid_y()),
    }
}

/// Anchor for a plain (arrowless) dialog: the host center, raised by half the
/// content height so a downward placement centers the panel.
pub fn plain_dialog_anchor(host_bounds: Rect, content_size: Size) -> Point {
    Point::new(
        host_bounds.mid_x(),
        host_bounds.mid_y() - content_size.height * 0.5,
    )
}

/// Everything [`compute_placement`] needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    /// Arrow tip in host coordinates.
    pub anchor: Point,
    /// Size of the content before arrow expansion.
    pub content_size: Size,
    /// Arrow base width and height.
    pub arrow_size: Size,
    /// Margin kept from the host edge when clamping.
    pub side_edge: f64,
    /// Host bounds.
    pub host_bounds: Rect,
    /// Direction; `Auto` is treated as `Down`.
    pub direction: Direction,
}

/// Resolved geometry for one show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Direction the placement was computed for.
    pub direction: Direction,
    /// Arrow tip in host coordinates.
    pub anchor: Point,
    /// The popover layer: frame, pivot, identity scale.
    pub layer: Layer,
    /// Content frame in popover-local coordinates.
    pub content_frame: Rect,
    /// Strip reserved for the arrow; content should pad by these.
    pub body_insets: Insets,
    /// Arrow tip in content-local coordinates.
    pub apex: Point,
}

impl Placement {
    /// Popover frame in host coordinates.
    #[inline]
    pub fn frame(&self) -> Rect {
        self.layer.frame()
    }

    /// Transform pivot in unit coordinates.
    #[inline]
    pub fn pivot(&self) -> Point {
        self.layer.anchor_point()
    }

    /// The arrow tip projected back into host coordinates.
    pub fn apex_in_host(&self) -> Point {
        let local = Point::new(
            self.content_frame.min_x() + self.apex.x,
            self.content_frame.min_y() + self.apex.y,
        );
        self.layer.to_parent(local)
    }
}

/// Clamp a span `[start, start + extent)` into `[host_min, host_max]`.
///
/// The side margin applies only when the span is strictly smaller than the
/// host and is capped at the available slack, so a span that fits always
/// ends up fully inside. Oversized spans are aligned to the far edge.
pub fn clamp_axis(start: f64, extent: f64, host_min: f64, host_max: f64, side_edge: f64) -> f64 {
    let host_extent = host_max - host_min;
    let side = if extent < host_extent {
        side_edge.max(0.0).min(host_extent - extent)
    } else {
        0.0
    };

    let overflow = start + extent - host_max;
    if overflow > 0.0 {
        start - (overflow + side)
    } else if start < host_min {
        start + (host_min - start) + side
    } else {
        start
    }
}

/// Compute the frame, pivot, and content layout for an arrow popover.
///
/// Must run once per show: the open-axis expansion is not idempotent.
pub fn compute_placement(input: PlacementInput) -> Placement {
    let PlacementInput {
        anchor,
        content_size,
        arrow_size,
        side_edge,
        host_bounds,
        direction,
    } = input;
    let open = direction.axis();
    let cross = open.cross();
    let arrow_height = arrow_size.height;

    let mut layer = Layer::new(Rect::from_size(content_size));
    let mut frame = layer.frame();

    // Cross axis: center on the anchor, then keep inside the host.
    let centered = match cross {
        Axis::Horizontal => anchor.x - content_size.width * 0.5,
        Axis::Vertical => anchor.y - content_size.height * 0.5,
    };
    let clamped = clamp_axis(
        centered,
        content_size.along(cross),
        host_bounds.min_along(cross),
        host_bounds.max_along(cross),
        side_edge,
    );
    frame.set_min_along(cross, clamped);

    // Open axis: butt the near edge against the anchor.
    let near = match direction {
        Direction::Up => anchor.y - content_size.height - arrow_height,
        Direction::Down | Direction::Auto => anchor.y,
        Direction::Left => anchor.x - content_size.width - arrow_height,
        Direction::Right => anchor.x,
    };
    frame.set_min_along(open, near);
    layer.set_frame(frame);

    layer.set_anchor_point(pivot_for(direction, anchor, frame, arrow_size));

    // Grow by the arrow; the pivot keeps the frame origin in place.
    let mut grown = layer.frame();
    grown.size = grown.size.grown(open, arrow_height);
    layer.set_frame(grown);

    let mut content_frame = Rect::from_size(content_size);
    if grown.size.along(open) != content_frame.size.along(open) {
        content_frame.size = content_frame.size.grown(open, arrow_height);
    }

    let body_insets = match direction {
        Direction::Up => Insets::new(0.0, 0.0, arrow_height, 0.0),
        Direction::Down | Direction::Auto => Insets::new(arrow_height, 0.0, 0.0, 0.0),
        Direction::Left => Insets::new(0.0, arrow_height, 0.0, 0.0),
        Direction::Right => Insets::new(0.0, 0.0, 0.0, arrow_height),
    };

    let local = layer.to_local(anchor);
    let apex = Point::new(
        local.x - content_frame.min_x(),
        local.y - content_frame.min_y(),
    );

    crate::trace!(
        ?direction,
        x = grown.min_x(),
        y = grown.min_y(),
        width = grown.width(),
        height = grown.height(),
        "computed popover placement"
    );

    Placement {
        direction,
        anchor,
        layer,
        content_frame,
        body_insets,
        apex,
    }
}

/// Unit-space pivot on the frame edge closest to the arrow tip.
fn pivot_for(direction: Direction, anchor: Point, frame: Rect, arrow_size: Size) -> Point {
    if arrow_size == Size::ZERO {
        return Layer::CENTER;
    }
    let fraction = |offset: f64, extent: f64| {
        if extent > 0.0 {
            (offset / extent).clamp(0.0, 1.0)
        } else {
            0.5
        }
    };
    let fx = fraction(anchor.x - frame.min_x(), frame.width());
    let fy = fraction(anchor.y - frame.min_y(), frame.height());
    match direction {
        Direction::Up => Point::new(fx, 1.0),
        Direction::Down | Direction::Auto => Point::new(fx, 0.0),
        Direction::Left => Point::new(1.0, fy),
        Direction::Right => Point::new(0.0, fy),
    }
}
