#![forbid(unsafe_code)]

//! Popover options and resolved style.
//!
//! [`PopoverOptions`] is a sparse bag: every field is optional and unset
//! fields leave the style alone. [`PopoverStyle`] is the fully resolved record
//! used for one presentation; it is computed once at show time, so mutating
//! options afterwards has no effect on a live popover.
//!
//! # Example
//!
//! ```
//! use perch_runtime::options::{PopoverOptions, PopoverStyle};
//! use perch_core::placement::Direction;
//!
//! let options = PopoverOptions::new()
//!     .corner_radius(10.0)
//!     .direction(Direction::Up);
//! let mut style = PopoverStyle::default();
//! style.apply(&options);
//! assert_eq!(style.corner_radius, 10.0);
//! assert_eq!(style.direction, Direction::Up);
//! ```

use std::time::Duration;

use perch_core::color::{BlurStyle, Rgba};
use perch_core::geometry::Size;
use perch_core::placement::Direction;

/// Smallest scale used for the collapsed popover; a true zero would make the
/// transform singular.
pub const MIN_SCALE: f64 = 0.0001;

/// Sparse set of overrides applied on top of a [`PopoverStyle`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopoverOptions {
    pub arrow_size: Option<Size>,
    pub animation_in: Option<Duration>,
    pub animation_out: Option<Duration>,
    pub entrance_delay: Option<Duration>,
    pub corner_radius: Option<f64>,
    pub side_edge: Option<f64>,
    pub overlay_color: Option<Rgba>,
    pub overlay_blur: Option<BlurStyle>,
    pub direction: Option<Direction>,
    pub content_color: Option<Rgba>,
    pub dismiss_on_tap: Option<bool>,
    pub show_overlay: Option<bool>,
    pub highlight_corner_radius: Option<f64>,
    pub spring_damping: Option<f64>,
    pub spring_velocity: Option<f64>,
}

impl PopoverOptions {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrow base width and height.
    #[must_use]
    pub fn arrow_size(mut self, size: Size) -> Self {
        self.arrow_size = Some(size);
        self
    }

    /// Entrance duration.
    #[must_use]
    pub fn animation_in(mut self, duration: Duration) -> Self {
        self.animation_in = Some(duration);
        self
    }

    /// Exit duration.
    #[must_use]
    pub fn animation_out(mut self, duration: Duration) -> Self {
        self.animation_out = Some(duration);
        self
    }

    /// Wait before the entrance animations start.
    #[must_use]
    pub fn entrance_delay(mut self, delay: Duration) -> Self {
        self.entrance_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    /// Margin kept from the host edge when the popover is clamped.
    #[must_use]
    pub fn side_edge(mut self, side_edge: f64) -> Self {
        self.side_edge = Some(side_edge);
        self
    }

    #[must_use]
    pub fn overlay_color(mut self, color: Rgba) -> Self {
        self.overlay_color = Some(color);
        self
    }

    /// Blur the backdrop instead of tinting it.
    #[must_use]
    pub fn overlay_blur(mut self, blur: BlurStyle) -> Self {
        self.overlay_blur = Some(blur);
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Popover background color.
    #[must_use]
    pub fn content_color(mut self, color: Rgba) -> Self {
        self.content_color = Some(color);
        self
    }

    #[must_use]
    pub fn dismiss_on_tap(mut self, enabled: bool) -> Self {
        self.dismiss_on_tap = Some(enabled);
        self
    }

    #[must_use]
    pub fn show_overlay(mut self, enabled: bool) -> Self {
        self.show_overlay = Some(enabled);
        self
    }

    /// Corner radius of the highlight cutout around the trigger.
    #[must_use]
    pub fn highlight_corner_radius(mut self, radius: f64) -> Self {
        self.highlight_corner_radius = Some(radius);
        self
    }

    #[must_use]
    pub fn spring_damping(mut self, damping: f64) -> Self {
        self.spring_damping = Some(damping);
        self
    }

    #[must_use]
    pub fn spring_velocity(mut self, velocity: f64) -> Self {
        self.spring_velocity = Some(velocity);
        self
    }

    /// Combine two bags; fields set in `later` win.
    #[must_use]
    pub fn merge(self, later: &PopoverOptions) -> Self {
        Self {
            arrow_size: later.arrow_size.or(self.arrow_size),
            animation_in: later.animation_in.or(self.animation_in),
            animation_out: later.animation_out.or(self.animation_out),
            entrance_delay: later.entrance_delay.or(self.entrance_delay),
            corner_radius: later.corner_radius.or(self.corner_radius),
            side_edge: later.side_edge.or(self.side_edge),
            overlay_color: later.overlay_color.or(self.overlay_color),
            overlay_blur: later.overlay_blur.or(self.overlay_blur),
            direction: later.direction.or(self.direction),
            content_color: later.content_color.or(self.content_color),
            dismiss_on_tap: later.dismiss_on_tap.or(self.dismiss_on_tap),
            show_overlay: later.show_overlay.or(self.show_overlay),
            highlight_corner_radius: later
                .highlight_corner_radius
                .or(self.highlight_corner_radius),
            spring_damping: later.spring_damping.or(self.spring_damping),
            spring_velocity: later.spring_velocity.or(self.spring_velocity),
        }
    }
}

/// Fully resolved appearance and timing for one presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PopoverStyle {
    pub arrow_size: Size,
    pub animation_in: Duration,
    pub animation_out: Duration,
    pub entrance_delay: Duration,
    pub corner_radius: f64,
    pub side_edge: f64,
    pub overlay_color: Rgba,
    pub overlay_blur: Option<BlurStyle>,
    pub direction: Direction,
    pub content_color: Rgba,
    pub dismiss_on_tap: bool,
    pub show_overlay: bool,
    pub highlight_corner_radius: f64,
    pub spring_damping: f64,
    pub spring_velocity: f64,
}

impl Default for PopoverStyle {
    fn default() -> Self {
        Self {
            arrow_size: Size::new(16.0, 10.0),
            animation_in: Duration::from_millis(600),
            animation_out: Duration::from_millis(300),
            entrance_delay: Duration::ZERO,
            corner_radius: 6.0,
            side_edge: 20.0,
            overlay_color: Rgba::BLACK.with_alpha(0.2),
            overlay_blur: None,
            direction: Direction::Auto,
            content_color: Rgba::WHITE,
            dismiss_on_tap: true,
            show_overlay: true,
            highlight_corner_radius: 0.0,
            spring_damping: 0.7,
            spring_velocity: 3.0,
        }
    }
}

impl PopoverStyle {
    /// Overwrite every field that `options` sets.
    pub fn apply(&mut self, options: &PopoverOptions) {
        if let Some(v) = options.arrow_size {
            self.arrow_size = v;
        }
        if let Some(v) = options.animation_in {
            self.animation_in = v;
        }
        if let Some(v) = options.animation_out {
            self.animation_out = v;
        }
        if let Some(v) = options.entrance_delay {
            self.entrance_delay = v;
        }
        if let Some(v) = options.corner_radius {
            self.corner_radius = v;
        }
        if let Some(v) = options.side_edge {
            self.side_edge = v;
        }
        if let Some(v) = options.overlay_color {
            self.overlay_color = v;
        }
        if let Some(v) = options.overlay_blur {
            self.overlay_blur = Some(v);
        }
        if let Some(v) = options.direction {
            self.direction = v;
        }
        if let Some(v) = options.content_color {
            self.content_color = v;
        }
        if let Some(v) = options.dismiss_on_tap {
            self.dismiss_on_tap = v;
        }
        if let Some(v) = options.show_overlay {
            self.show_overlay = v;
        }
        if let Some(v) = options.highlight_corner_radius {
            self.highlight_corner_radius = v;
        }
        if let Some(v) = options.spring_damping {
            self.spring_damping = v;
        }
        if let Some(v) = options.spring_velocity {
            self.spring_velocity = v;
        }
    }

    /// A copy with `options` applied.
    #[must_use]
    pub fn with(mut self, options: &PopoverOptions) -> Self {
        self.apply(options);
        self
    }
}

/// Presenter-wide configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenterConfig {
    /// Style every presentation starts from.
    pub defaults: PopoverStyle,
    /// Scale of the collapsed popover at the start of the entrance and the
    /// end of the exit.
    pub min_scale: f64,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            defaults: PopoverStyle::default(),
            min_scale: MIN_SCALE,
        }
    }
}

impl PresenterConfig {
    /// Replace the default style.
    #[must_use]
    pub fn defaults(mut self, defaults: PopoverStyle) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the collapsed scale; non-positive or non-finite values fall back to
    /// [`MIN_SCALE`].
    #[must_use]
    pub fn min_scale(mut self, min_scale: f64) -> Self {
        self.min_scale = if min_scale.is_finite() && min_scale > 0.0 {
            min_scale
        } else {
            MIN_SCALE
        };
        self
    }
}
