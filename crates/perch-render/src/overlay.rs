#![forbid(unsafe_code)]

//! Dimming overlay with an optional highlight cutout.
//!
//! The overlay covers the whole host. Its fill region is the host rectangle
//! minus a rounded hole around the trigger, evaluated with the even-odd rule
//! so the hole stays clear regardless of path direction.

use kurbo::{BezPath, RoundedRect, Shape};
use perch_core::color::{BlurStyle, Rgba};
use perch_core::geometry::{Point, Rect};

use crate::{to_kurbo_point, to_kurbo_rect};

/// Flattening tolerance for the cutout corners.
const CUTOUT_TOLERANCE: f64 = 0.1;

/// How the overlay is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayFill {
    Color(Rgba),
    Blur(BlurStyle),
}

impl Default for OverlayFill {
    fn default() -> Self {
        Self::Color(Rgba::BLACK.with_alpha(0.2))
    }
}

/// Clear hole in the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutout {
    pub rect: Rect,
    pub radius: f64,
}

/// Result of a tap on the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapOutcome {
    /// The popover should dismiss.
    Dismiss,
    /// The overlay absorbs the tap without dismissing.
    Swallow,
    /// No overlay; the tap reaches whatever is underneath.
    PassThrough,
}

/// Everything a host needs to draw and hit-test the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor {
    pub frame: Rect,
    /// Painted (`true`) or a transparent tap catcher (`false`).
    pub visible: bool,
    pub fill: OverlayFill,
    pub cutout: Option<Cutout>,
    pub dismiss_on_tap: bool,
    /// Current opacity; starts at 0 and is animated by the presenter.
    pub alpha: f32,
}

impl OverlayDescriptor {
    /// Host rectangle plus the cutout, to be filled with the even-odd rule.
    pub fn fill_path(&self) -> BezPath {
        let mut path = to_kurbo_rect(self.frame).to_path(CUTOUT_TOLERANCE);
        if let Some(cutout) = self.cutout {
            let hole = RoundedRect::from_rect(to_kurbo_rect(cutout.rect), cutout.radius);
            path.extend(hole.path_elements(CUTOUT_TOLERANCE));
        }
        path
    }

    /// Whether `point` is painted by the overlay.
    pub fn is_filled_at(&self, point: Point) -> bool {
        if !self.visible {
            return false;
        }
        self.fill_path().winding(to_kurbo_point(point)) % 2 != 0
    }

    /// Outcome of a tap anywhere on the overlay.
    pub fn tap(&self) -> TapOutcome {
        if self.dismiss_on_tap {
            TapOutcome::Dismiss
        } else {
            TapOutcome::Swallow
        }
    }

    /// Same descriptor at a new opacity.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

/// Describe the overlay for one presentation.
///
/// Returns `None` when the overlay is neither shown nor needed to catch taps.
/// The cutout radius is clamped to half the cutout's shorter side.
pub fn build_overlay(
    host_bounds: Rect,
    visible: bool,
    fill: OverlayFill,
    cutout: Option<Rect>,
    cutout_radius: f64,
    dismiss_on_tap: bool,
) -> Option<OverlayDescriptor> {
    if !visible && !dismiss_on_tap {
        return None;
    }
    let cutout = cutout.map(|rect| Cutout {
        rect,
        radius: cutout_radius
            .max(0.0)
            .min(rect.width().min(rect.height()).max(0.0) * 0.5),
    });
    perch_core::debug!(
        visible,
        dismiss_on_tap,
        has_cutout = cutout.is_some(),
        "built overlay"
    );
    Some(OverlayDescriptor {
        frame: host_bounds,
        visible,
        fill,
        cutout,
        dismiss_on_tap,
        alpha: 0.0,
    })
}
