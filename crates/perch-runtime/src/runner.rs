#![forbid(unsafe_code)]

//! The animation runner seam.
//!
//! The presenter describes each animation as an [`AnimationRequest`] and
//! hands it to an [`AnimationRunner`]. The runner owns timing; the presenter
//! only learns about progress through [`AnimationRunner::progress`] and about
//! completion through [`AnimationRunner::drain_completed`]. Every request must
//! eventually be reported complete, otherwise the popover is stuck mid-phase.
//!
//! [`TimelineRunner`] is a tick-driven runner for hosts without an animation
//! engine of their own.

use std::time::Duration;

use perch_core::animation::{Curve, Timeline};

use crate::host::{NodeId, Tag};

/// Identifies one requested animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

/// The property being animated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationTarget {
    /// Uniform scale of the popover container around its pivot.
    PopoverScale { from: f64, to: f64 },
    /// Opacity of the overlay.
    OverlayAlpha { from: f64, to: f64 },
}

impl AnimationTarget {
    /// Value at normalized progress `t` (not clamped, so springs overshoot).
    pub fn interpolate(self, t: f64) -> f64 {
        let (from, to) = self.range();
        from + (to - from) * t
    }

    /// Final value.
    pub fn end(self) -> f64 {
        self.range().1
    }

    fn range(self) -> (f64, f64) {
        match self {
            Self::PopoverScale { from, to } | Self::OverlayAlpha { from, to } => (from, to),
        }
    }
}

/// One animation handed to a runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    pub id: AnimationId,
    pub tag: Tag,
    /// Host node whose property is animated.
    pub node: NodeId,
    pub target: AnimationTarget,
    pub duration: Duration,
    pub delay: Duration,
    pub curve: Curve,
}

/// Current value of a running animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSample {
    pub id: AnimationId,
    pub target: AnimationTarget,
    pub value: f64,
}

/// Something that can run animations and report their completion.
pub trait AnimationRunner {
    /// Start `request`.
    fn animate(&mut self, request: AnimationRequest);

    /// Take the ids of every animation that finished since the last call.
    fn drain_completed(&mut self) -> Vec<AnimationId>;

    /// Intermediate values to push to the host.
    ///
    /// Runners that apply values themselves return nothing.
    fn progress(&self) -> Vec<AnimationSample> {
        Vec::new()
    }
}

/// Tick-driven runner backed by a [`Timeline`].
#[derive(Debug, Default)]
pub struct TimelineRunner {
    timeline: Timeline<AnimationId>,
    requests: Vec<AnimationRequest>,
}

impl TimelineRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every running animation by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.timeline.tick(dt);
    }

    /// Jump every running animation to its end.
    pub fn finish_all(&mut self) {
        self.timeline.finish_all();
    }

    /// Number of animations still running.
    pub fn running(&self) -> usize {
        self.timeline.len()
    }

    /// Whether nothing is running.
    pub fn is_idle(&self) -> bool {
        self.timeline.is_empty()
    }
}

impl AnimationRunner for TimelineRunner {
    fn animate(&mut self, request: AnimationRequest) {
        tracing::trace!(
            id = request.id.0,
            tag = request.tag.0,
            duration_ms = request.duration.as_millis() as u64,
            "timeline animation started"
        );
        self.timeline.insert_delayed(
            request.id,
            request.delay,
            request.curve.animation(request.duration),
        );
        self.requests.retain(|r| r.id != request.id);
        self.requests.push(request);
    }

    fn drain_completed(&mut self) -> Vec<AnimationId> {
        let done = self.timeline.drain_completed();
        self.requests.retain(|r| !done.contains(&r.id));
        done
    }

    fn progress(&self) -> Vec<AnimationSample> {
        self.requests
            .iter()
            .filter_map(|r| {
                self.timeline.position(r.id).map(|t| AnimationSample {
                    id: r.id,
                    target: r.target,
                    value: r.target.interpolate(t),
                })
            })
            .collect()
    }
}
