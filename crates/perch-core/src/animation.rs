#![forbid(unsafe_code)]

//! Time-based animation curves for popover entrance and exit.
//!
//! Animations produce normalized progress values and are advanced explicitly
//! with [`Animation::tick`]; nothing here owns a clock. [`Timeline`] runs many
//! keyed animations at once and queues their completions for the caller to
//! drain, which is how a host without a native animation engine drives
//! presentation.
//!
//! Two readings of progress are offered. [`Animation::value`] is clamped to
//! `[0, 1]` for properties that must stay in range (opacity).
//! [`Animation::position`] is the raw curve, so an underdamped spring can
//! carry a scale past its target and back.
//!
//! [`Timeline`]: timeline::Timeline

pub mod timeline;

use std::time::Duration;

pub use timeline::Timeline;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// Timing curve requested from an animation runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// Constant velocity.
    Linear,
    /// Slow start and end.
    EaseInOut,
    /// Damped spring that settles within the animation duration.
    Spring {
        /// Damping ratio; `1.0` is critically damped, lower values bounce.
        damping: f64,
        /// Initial velocity, in total distances per second.
        velocity: f64,
    },
}

impl Curve {
    /// Build the [`Animation`] that realizes this curve over `duration`.
    pub fn animation(self, duration: Duration) -> Box<dyn Animation> {
        match self {
            Self::Linear => Box::new(Fade::new(duration)),
            Self::EaseInOut => Box::new(Fade::new(duration).easing(ease_in_out)),
            Self::Spring { damping, velocity } => {
                Box::new(Spring::new(duration, damping, velocity))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation running from 0.0 to 1.0.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current progress, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Current progress without clamping.
    fn position(&self) -> f64 {
        f64::from(self.value())
    }
}

fn nonzero(duration: Duration) -> Duration {
    if duration.is_zero() {
        Duration::from_nanos(1)
    } else {
        duration
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Eased progression from 0.0 to 1.0 over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Linear fade over `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: nonzero(duration),
            easing: linear,
        }
    }

    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.progress())
    }
}

// ---------------------------------------------------------------------------
// Spring
// ---------------------------------------------------------------------------

/// Envelope left after `duration`: the oscillation is tuned so the
/// displacement decays to this fraction by the end.
const SETTLE_FRACTION: f64 = 1e-3;

/// Damped harmonic motion from 0.0 toward 1.0 that settles in a fixed time.
///
/// The natural frequency is derived from the duration and damping ratio so
/// the envelope reaches [`SETTLE_FRACTION`] exactly at the end; the position
/// snaps to 1.0 on completion. Underdamped springs overshoot, so
/// [`Animation::position`] can exceed 1.0 while [`Animation::value`] is
/// clamped.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    elapsed: Duration,
    duration: Duration,
    damping: f64,
    velocity: f64,
    omega: f64,
}

impl Spring {
    /// Create a spring with damping ratio in (0, 1] and initial velocity.
    pub fn new(duration: Duration, damping: f64, velocity: f64) -> Self {
        let duration = nonzero(duration);
        let damping = if damping.is_finite() {
            damping.clamp(0.01, 1.0)
        } else {
            1.0
        };
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let omega = -SETTLE_FRACTION.ln() / (damping * duration.as_secs_f64());
        Self {
            elapsed: Duration::ZERO,
            duration,
            damping,
            velocity,
            omega,
        }
    }

    /// Damping ratio after clamping.
    pub fn damping(&self) -> f64 {
        self.damping
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.position() as f32).clamp(0.0, 1.0)
    }

    fn position(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f64();
        let zeta = self.damping;
        let omega = self.omega;
        let envelope = (-zeta * omega * t).exp();
        // Displacement from rest starts at -1 with velocity `self.velocity`.
        let displacement = if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let b = (self.velocity - zeta * omega) / omega_d;
            envelope * (-(omega_d * t).cos() + b * (omega_d * t).sin())
        } else {
            let b = self.velocity - omega;
            envelope * (-1.0 + b * t)
        };
        1.0 + displacement
    }
}

// ---------------------------------------------------------------------------
// Delayed
// ---------------------------------------------------------------------------

/// Hold at 0.0 for a delay, then play the inner animation.
#[derive(Debug, Clone, Copy)]
pub struct Delayed<A> {
    delay: Duration,
    waited: Duration,
    inner: A,
}

impl<A: Animation> Delayed<A> {
    pub fn new(delay: Duration, inner: A) -> Self {
        Self {
            delay,
            waited: Duration::ZERO,
            inner,
        }
    }

    fn started(&self) -> bool {
        self.waited >= self.delay
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        let remaining = self.delay.saturating_sub(self.waited);
        self.waited = self.waited.saturating_add(dt.min(remaining));
        let carry = dt.saturating_sub(remaining);
        if self.started() && !carry.is_zero() {
            self.inner.tick(carry);
        }
    }

    fn is_complete(&self) -> bool {
        self.started() && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        if self.started() { self.inner.value() } else { 0.0 }
    }

    fn position(&self) -> f64 {
        if self.started() { self.inner.position() } else { 0.0 }
    }
}

impl Animation for Box<dyn Animation> {
    fn tick(&mut self, dt: Duration) {
        (**self).tick(dt);
    }

    fn is_complete(&self) -> bool {
        (**self).is_complete()
    }

    fn value(&self) -> f32 {
        (**self).value()
    }

    fn position(&self) -> f64 {
        (**self).position()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
