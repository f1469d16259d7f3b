//! Property-based invariant tests for the presenter.
//!
//! 1. A full show/dismiss cycle always leaves the host empty.
//! 2. Re-presenting an occupied tag never inserts another node.
//! 3. The arrow tip lands on the trigger edge facing the popover.
//! 4. Fitting content stays inside the host on the cross axis.

use perch_core::geometry::{Rect, Size};
use perch_core::placement::{Direction, arrow_anchor};
use perch_harness::{HeadlessHost, ImmediateRunner};
use perch_runtime::{
    Host, PopoverOptions, Presentation, Presenter, Tag, ViewId,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const EPS: f64 = 1e-6;
const TRIGGER: ViewId = ViewId(1);

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Auto),
    ]
}

/// Host, trigger frame inside it, and content that fits.
fn scene_strategy() -> impl Strategy<Value = (Rect, Rect, Size)> {
    (240.0f64..=1000.0, 240.0f64..=1000.0).prop_flat_map(|(w, h)| {
        (
            Just(Rect::new(0.0, 0.0, w, h)),
            (0.0..w - 40.0, 0.0..h - 40.0, 10.0f64..=40.0, 10.0f64..=40.0)
                .prop_map(|(x, y, tw, th)| Rect::new(x, y, tw, th)),
            (20.0..=w - 20.0, 20.0..=h - 20.0).prop_map(|(cw, ch)| Size::new(cw, ch)),
        )
    })
}

fn presenter(host: Rect, trigger: Rect, content: Size) -> Presenter<HeadlessHost, ImmediateRunner> {
    let host = HeadlessHost::new(host.width(), host.height()).with_view(TRIGGER, trigger);
    let mut p = Presenter::new(ImmediateRunner::new()).with_host(host);
    p.attachments_mut().set_content_size(TRIGGER, content);
    p
}

fn node_count(p: &Presenter<HeadlessHost, ImmediateRunner>) -> usize {
    p.host().map_or(0, |h| h.subview_count())
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Lifecycle bookkeeping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cycle_leaves_host_empty(
        (host, trigger, content) in scene_strategy(),
        direction in direction_strategy(),
        show_overlay in any::<bool>(),
        dismiss_on_tap in any::<bool>(),
        repeats in 1usize..=3,
    ) {
        let mut p = presenter(host, trigger, content);
        let options = PopoverOptions::new()
            .direction(direction)
            .show_overlay(show_overlay)
            .dismiss_on_tap(dismiss_on_tap);

        p.present(Presentation::view(ViewId(2), TRIGGER, Tag(1)).options(options.clone()));
        let expected = 1 + usize::from(show_overlay || dismiss_on_tap);
        prop_assert_eq!(node_count(&p), expected);

        for _ in 0..repeats {
            prop_assert!(p.present(Presentation::view(ViewId(2), TRIGGER, Tag(1))).is_none());
            prop_assert_eq!(node_count(&p), expected);
        }

        p.pump();
        prop_assert!(p.dismiss(Tag(1)));
        p.pump();
        prop_assert!(!p.is_occupied(Tag(1)));
        prop_assert_eq!(node_count(&p), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–4. Geometry through the presenter
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arrow_tip_touches_trigger(
        (host, trigger, content) in scene_strategy(),
        direction in direction_strategy(),
    ) {
        let mut p = presenter(host, trigger, content);
        p.present(
            Presentation::view(ViewId(2), TRIGGER, Tag(1))
                .options(PopoverOptions::new().direction(direction)),
        );
        let instance = p.instance(Tag(1));
        prop_assert!(instance.is_some());
        if let Some(instance) = instance {
            let resolved = instance.direction();
            prop_assert!(resolved.is_resolved());
            if direction.is_resolved() {
                prop_assert_eq!(resolved, direction);
            }
            let placement = instance.placement();
            prop_assert!(placement.is_some());
            if let Some(placement) = placement {
                let expected = arrow_anchor(trigger, resolved);
                prop_assert!(placement.apex_in_host().approx_eq(expected, EPS));

                let frame = placement.frame();
                match resolved {
                    Direction::Left | Direction::Right => {
                        prop_assert!(frame.min_y() >= -EPS && frame.max_y() <= host.max_y() + EPS);
                    }
                    _ => {
                        prop_assert!(frame.min_x() >= -EPS && frame.max_x() <= host.max_x() + EPS);
                    }
                }
            }
        }
    }
}
