#![forbid(unsafe_code)]

//! Headless host and animation runners for exercising popovers without a UI
//! toolkit.
//!
//! - [`HeadlessHost`] keeps views and inserted nodes in memory and records
//!   every call the presenter makes.
//! - [`ImmediateRunner`] completes every animation as soon as it is requested,
//!   so one [`Presenter::pump`] finishes a phase.
//! - [`drive`] steps a [`TimelineRunner`] in fixed increments for tests that
//!   care about intermediate values.
//!
//! # Quick Start
//!
//! ```
//! use perch_core::geometry::Rect;
//! use perch_harness::{HeadlessHost, ImmediateRunner};
//! use perch_runtime::{Phase, Presentation, Presenter, Tag, ViewId};
//!
//! let host = HeadlessHost::new(375.0, 800.0).with_view(ViewId(1), Rect::new(150.0, 100.0, 80.0, 40.0));
//! let mut presenter = Presenter::new(ImmediateRunner::new()).with_host(host);
//!
//! presenter.present(Presentation::view(ViewId(2), ViewId(1), Tag(1)));
//! presenter.pump();
//! assert_eq!(presenter.phase(Tag(1)), Some(Phase::Visible));
//! ```

pub mod headless;

pub use headless::{HeadlessHost, HostCall};

use std::time::Duration;

use perch_runtime::runner::{AnimationId, AnimationRequest, AnimationRunner, TimelineRunner};
use perch_runtime::{Host, Presenter};

/// Runner that finishes every animation immediately.
#[derive(Debug, Default)]
pub struct ImmediateRunner {
    requests: Vec<AnimationRequest>,
    completed: Vec<AnimationId>,
}

impl ImmediateRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> &[AnimationRequest] {
        &self.requests
    }

    /// Completions not yet drained.
    pub fn pending(&self) -> usize {
        self.completed.len()
    }
}

impl AnimationRunner for ImmediateRunner {
    fn animate(&mut self, request: AnimationRequest) {
        self.completed.push(request.id);
        self.requests.push(request);
    }

    fn drain_completed(&mut self) -> Vec<AnimationId> {
        std::mem::take(&mut self.completed)
    }
}

/// Tick the presenter's timeline by `step` until `total` has elapsed,
/// pumping after each step.
pub fn drive<H: Host>(presenter: &mut Presenter<H, TimelineRunner>, total: Duration, step: Duration) {
    if step.is_zero() {
        return;
    }
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        let dt = step.min(total - elapsed);
        presenter.runner_mut().tick(dt);
        presenter.pump();
        elapsed += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_core::animation::Curve;
    use perch_runtime::host::{NodeId, Tag};
    use perch_runtime::runner::AnimationTarget;

    #[test]
    fn immediate_runner_completes_in_request_order() {
        let mut runner = ImmediateRunner::new();
        for id in [3, 1] {
            runner.animate(AnimationRequest {
                id: AnimationId(id),
                tag: Tag(0),
                node: NodeId(0),
                target: AnimationTarget::OverlayAlpha { from: 0.0, to: 1.0 },
                duration: Duration::from_millis(10),
                delay: Duration::ZERO,
                curve: Curve::Linear,
            });
        }
        assert_eq!(runner.pending(), 2);
        assert_eq!(runner.drain_completed(), vec![AnimationId(3), AnimationId(1)]);
        assert_eq!(runner.requests().len(), 2);
        assert!(runner.drain_completed().is_empty());
    }
}
