#![forbid(unsafe_code)]

//! End-to-end presentation scenarios against the headless host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use perch_core::animation::Curve;
use perch_core::geometry::{Point, Rect, Size};
use perch_core::placement::Direction;
use perch_harness::{HeadlessHost, HostCall, ImmediateRunner, drive};
use perch_render::overlay::TapOutcome;
use perch_runtime::runner::{AnimationRunner, AnimationTarget, TimelineRunner};
use perch_runtime::{
    DialogKind, Handlers, Host, Phase, PopoverEvent, PopoverOptions, Presentation, Presenter,
    ScreenId, ShowError, Tag, ViewId,
};

// ============================================================================
// Fixtures
// ============================================================================

const EPS: f64 = 1e-9;
const TRIGGER: ViewId = ViewId(1);
const CONTENT: ViewId = ViewId(2);
const TAG: Tag = Tag(7);

fn host() -> HeadlessHost {
    HeadlessHost::new(375.0, 800.0).with_view(TRIGGER, Rect::new(150.0, 100.0, 80.0, 40.0))
}

fn presenter() -> Presenter<HeadlessHost, ImmediateRunner> {
    Presenter::new(ImmediateRunner::new()).with_host(host())
}

fn request() -> Presentation {
    Presentation::view(CONTENT, TRIGGER, TAG)
}

fn host_of<R: AnimationRunner>(presenter: &Presenter<HeadlessHost, R>) -> &HeadlessHost {
    presenter.host().expect("host attached")
}

/// Records handler invocations by name.
fn recording_handlers(log: &Rc<RefCell<Vec<&'static str>>>) -> Handlers {
    let push = |name: &'static str| {
        let log = Rc::clone(log);
        move || log.borrow_mut().push(name)
    };
    Handlers::new()
        .on_will_show(push("will_show"))
        .on_did_show(push("did_show"))
        .on_will_dismiss(push("will_dismiss"))
        .on_did_dismiss(push("did_dismiss"))
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn show_and_dismiss_walk_every_phase() {
    let mut p = presenter();
    assert!(p.present(request()).is_some());
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingIn));
    assert_eq!(p.drain_events(), vec![PopoverEvent::WillShow(TAG)]);

    p.pump();
    assert_eq!(p.phase(TAG), Some(Phase::Visible));
    assert_eq!(p.drain_events(), vec![PopoverEvent::DidShow(TAG)]);

    assert!(p.dismiss(TAG));
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingOut));
    assert_eq!(p.drain_events(), vec![PopoverEvent::WillDismiss(TAG)]);

    p.pump();
    assert!(!p.is_occupied(TAG));
    assert_eq!(p.drain_events(), vec![PopoverEvent::DidDismiss(TAG)]);
    assert_eq!(host_of(&p).subview_count(), 0);
}

#[test]
fn handlers_fire_exactly_once_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut p = presenter();
    p.present(request().handlers(recording_handlers(&log)));
    p.pump();
    p.dismiss(TAG);
    p.dismiss(TAG);
    p.pump();
    p.pump();
    assert_eq!(
        *log.borrow(),
        vec!["will_show", "did_show", "will_dismiss", "did_dismiss"]
    );
}

#[test]
fn dismiss_during_entrance_is_rejected() {
    let mut p = presenter();
    p.present(request());
    assert!(!p.dismiss(TAG));
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingIn));

    p.pump();
    assert!(p.dismiss(TAG));
}

#[test]
fn tag_is_free_again_after_teardown() {
    let mut p = presenter();
    let first = p.present(request());
    p.pump();
    p.dismiss(TAG);
    assert!(p.present(request()).is_none(), "still animating out");
    p.pump();
    let second = p.present(request());
    assert!(second.is_some());
    assert_ne!(first, second);
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn occupied_tag_is_a_no_op() {
    let mut p = presenter();
    let first = p.present(request());
    p.pump();
    assert_eq!(p.phase(TAG), Some(Phase::Visible));

    let calls_before = host_of(&p).calls().len();
    assert!(p.present(request()).is_none());
    assert_eq!(
        p.try_present(request()).err(),
        Some(ShowError::TagOccupied)
    );
    assert_eq!(p.popover_id(TAG), first);
    assert_eq!(host_of(&p).overlays().len(), 1);
    assert_eq!(host_of(&p).popovers().len(), 1);
    assert_eq!(host_of(&p).calls().len(), calls_before);
}

#[test]
fn distinct_tags_coexist() {
    let mut p = presenter();
    p.present(request());
    p.present(Presentation::view(ViewId(3), TRIGGER, Tag(8)));
    assert_eq!(p.active(), 2);
    assert_eq!(host_of(&p).popovers().len(), 2);
}

#[test]
fn missing_host_is_a_no_op() {
    let mut p: Presenter<HeadlessHost, ImmediateRunner> = Presenter::new(ImmediateRunner::new());
    assert!(p.present(request()).is_none());
    assert_eq!(p.try_present(request()).err(), Some(ShowError::NoHost));
    assert!(p.runner().requests().is_empty());
}

#[test]
fn vanished_trigger_is_a_no_op() {
    let mut p = presenter();
    if let Some(host) = p.host_mut() {
        host.remove_view(TRIGGER);
    }
    assert_eq!(p.try_present(request()).err(), Some(ShowError::TriggerGone));
    assert!(!p.is_occupied(TAG));
    assert!(host_of(&p).calls().is_empty());
}

#[test]
fn missing_content_is_a_no_op() {
    let mut p = presenter();
    assert_eq!(
        p.try_present(Presentation::attached(TRIGGER, TAG)).err(),
        Some(ShowError::MissingContent)
    );
    assert!(!p.is_occupied(TAG));
}

// ============================================================================
// Placement through the presenter
// ============================================================================

#[test]
fn default_popover_hangs_below_trigger() {
    let mut p = presenter();
    p.present(request());
    let instance = p.instance(TAG).expect("instance");
    assert_eq!(instance.direction(), Direction::Down);
    let frame = instance.placement().expect("placed").frame();
    assert!(frame.approx_eq(&Rect::new(140.0, 140.0, 100.0, 110.0), EPS));
    assert!(
        instance
            .placement()
            .expect("placed")
            .apex_in_host()
            .approx_eq(Point::new(190.0, 140.0), EPS)
    );
}

#[test]
fn trigger_near_bottom_opens_upward() {
    let host = HeadlessHost::new(375.0, 800.0).with_view(TRIGGER, Rect::new(150.0, 720.0, 80.0, 44.0));
    let mut p = Presenter::new(ImmediateRunner::new()).with_host(host);
    p.attachments_mut().set_content_size(TRIGGER, Size::new(200.0, 200.0));
    p.present(request());

    let instance = p.instance(TAG).expect("instance");
    assert_eq!(instance.direction(), Direction::Up);
    let frame = instance.placement().expect("placed").frame();
    assert!((frame.min_y() - (720.0 - 200.0 - 10.0)).abs() < EPS);
    assert!((frame.max_y() - 720.0).abs() < EPS);
}

#[test]
fn oversized_content_clamps_to_far_edge() {
    let host = HeadlessHost::new(280.0, 600.0).with_view(TRIGGER, Rect::new(160.0, 60.0, 80.0, 40.0));
    let mut p = Presenter::new(ImmediateRunner::new()).with_host(host);
    p.attachments_mut().set_content_size(TRIGGER, Size::new(300.0, 120.0));
    p.present(request());
    let frame = p.instance(TAG).and_then(|i| i.placement()).expect("placed").frame();
    assert!((frame.max_x() - 280.0).abs() < EPS);
}

#[test]
fn plain_dialog_is_centered_without_cutout() {
    let mut p = presenter();
    p.attachments_mut().set_dialog_kind(TRIGGER, DialogKind::Plain);
    p.attachments_mut().set_content_size(TRIGGER, Size::new(200.0, 100.0));
    p.present(request());

    let instance = p.instance(TAG).expect("instance");
    let frame = instance.placement().expect("placed").frame();
    assert!(frame.approx_eq(&Rect::new(87.5, 350.0, 200.0, 100.0), EPS));
    assert_eq!(instance.layer().anchor_point(), Point::new(0.5, 0.5));
    assert_eq!(host_of(&p).overlays()[0].cutout, None);
}

#[test]
fn arrow_popover_highlights_trigger() {
    let mut p = presenter();
    p.present(request());
    let cutout = host_of(&p).overlays()[0].cutout.expect("cutout");
    assert_eq!(cutout.rect, Rect::new(150.0, 100.0, 80.0, 40.0));
    assert_eq!(cutout.radius, 0.0);
}

#[test]
fn rounded_highlight_grows_by_its_radius() {
    let mut p = presenter();
    p.present(request().options(PopoverOptions::new().highlight_corner_radius(4.0)));
    let overlay = host_of(&p).overlays()[0].clone();
    let cutout = overlay.cutout.expect("cutout");
    assert_eq!(cutout.rect, Rect::new(146.0, 96.0, 88.0, 48.0));
    assert_eq!(cutout.radius, 4.0);
    // The rounded corners stay clear of the trigger's own corners.
    assert!(!overlay.is_filled_at(Point::new(150.5, 100.5)));
    assert!(!overlay.is_filled_at(Point::new(148.0, 120.0)));
    assert!(overlay.is_filled_at(Point::new(144.0, 120.0)));
    assert!(overlay.is_filled_at(Point::new(10.0, 10.0)));
}

#[test]
fn overlay_sits_behind_popover() {
    let mut p = presenter();
    p.present(request());
    let instance = p.instance(TAG).expect("instance");
    let host = host_of(&p);
    let overlay = host.index_of(instance.overlay_node().expect("overlay"));
    let popover = host.index_of(instance.popover_node().expect("popover"));
    assert!(overlay < popover, "{overlay:?} !< {popover:?}");
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn present_options_override_recorded_options() {
    let mut p = presenter();
    p.attachments_mut().set_options(
        TRIGGER,
        PopoverOptions::new()
            .corner_radius(3.0)
            .arrow_size(Size::new(20.0, 12.0)),
    );
    p.present(request().options(PopoverOptions::new().corner_radius(9.0)));
    let style = p.instance(TAG).and_then(|i| i.style()).expect("style").clone();
    assert_eq!(style.corner_radius, 9.0);
    assert_eq!(style.arrow_size, Size::new(20.0, 12.0));
    let frame = p.instance(TAG).and_then(|i| i.placement()).expect("placed").frame();
    assert!((frame.height() - 112.0).abs() < EPS);
}

#[test]
fn entrance_uses_spring_and_fast_overlay_fade() {
    let mut p = presenter();
    p.present(request());
    let requests = p.runner().requests().to_vec();
    assert_eq!(requests.len(), 2);

    let scale = requests
        .iter()
        .find(|r| matches!(r.target, AnimationTarget::PopoverScale { .. }))
        .expect("scale request");
    assert_eq!(scale.duration, Duration::from_millis(600));
    assert_eq!(scale.curve, Curve::Spring { damping: 0.7, velocity: 3.0 });
    assert_eq!(scale.target, AnimationTarget::PopoverScale { from: 0.0001, to: 1.0 });

    let fade = requests
        .iter()
        .find(|r| matches!(r.target, AnimationTarget::OverlayAlpha { .. }))
        .expect("fade request");
    assert_eq!(fade.duration, Duration::from_millis(200));
    assert_eq!(fade.curve, Curve::Linear);
}

#[test]
fn entrance_delay_applies_to_entrance_only() {
    let mut p = presenter();
    let delay = Duration::from_millis(80);
    p.present(request().options(PopoverOptions::new().entrance_delay(delay)));
    p.pump();
    p.dismiss(TAG);
    let requests = p.runner().requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[..2].iter().all(|r| r.delay == delay));
    assert!(requests[2..].iter().all(|r| r.delay.is_zero()));
}

#[test]
fn entrance_delay_holds_the_collapsed_popover() {
    let mut p = Presenter::new(TimelineRunner::new()).with_host(host());
    p.present(request().options(PopoverOptions::new().entrance_delay(Duration::from_millis(100))));
    drive(&mut p, Duration::from_millis(80), Duration::from_millis(40));
    assert!(p.instance(TAG).expect("instance").layer().scale() < 0.001);
    assert_eq!(host_of(&p).overlays()[0].alpha, 0.0);

    drive(&mut p, Duration::from_millis(620), Duration::from_millis(40));
    assert_eq!(p.phase(TAG), Some(Phase::Visible));
}

#[test]
fn exit_collapses_and_fades_together() {
    let mut p = presenter();
    p.present(request().options(PopoverOptions::new().animation_out(Duration::from_millis(250))));
    p.pump();
    p.dismiss(TAG);
    let requests = p.runner().requests();
    let exit: Vec<_> = requests[2..].to_vec();
    assert_eq!(exit.len(), 2);
    assert!(exit.iter().all(|r| r.duration == Duration::from_millis(250)));
    assert!(exit.iter().any(|r| r.target == AnimationTarget::OverlayAlpha { from: 1.0, to: 0.0 }));
    assert!(exit.iter().any(|r| r.target == AnimationTarget::PopoverScale { from: 1.0, to: 0.0001 }));
}

// ============================================================================
// Overlay taps
// ============================================================================

#[test]
fn overlay_tap_dismisses_by_default() {
    let mut p = presenter();
    p.present(request());
    p.pump();
    assert_eq!(p.overlay_tapped(TAG), TapOutcome::Dismiss);
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingOut));
}

#[test]
fn overlay_tap_during_entrance_dismisses_once_visible() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut p = presenter();
    p.present(request().handlers(recording_handlers(&log)));
    assert_eq!(p.overlay_tapped(TAG), TapOutcome::Dismiss);
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingIn));

    p.pump();
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingOut));
    assert_eq!(
        p.drain_events(),
        vec![
            PopoverEvent::WillShow(TAG),
            PopoverEvent::DidShow(TAG),
            PopoverEvent::WillDismiss(TAG),
        ]
    );

    p.pump();
    assert!(!p.is_occupied(TAG));
    assert_eq!(p.drain_events(), vec![PopoverEvent::DidDismiss(TAG)]);
    assert_eq!(
        *log.borrow(),
        vec!["will_show", "did_show", "will_dismiss", "did_dismiss"]
    );
    assert_eq!(host_of(&p).subview_count(), 0);
}

#[test]
fn overlay_tap_mid_entrance_on_timeline_runner() {
    let mut p = Presenter::new(TimelineRunner::new()).with_host(host());
    p.present(request());
    drive(&mut p, Duration::from_millis(100), Duration::from_millis(50));
    assert_eq!(p.overlay_tapped(TAG), TapOutcome::Dismiss);

    drive(&mut p, Duration::from_millis(500), Duration::from_millis(50));
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingOut));
    drive(&mut p, Duration::from_millis(300), Duration::from_millis(50));
    assert!(!p.is_occupied(TAG));
    assert!(p.runner().is_idle());
}

#[test]
fn modal_overlay_swallows_taps() {
    let mut p = presenter();
    p.present(request().options(PopoverOptions::new().dismiss_on_tap(false)));
    p.pump();
    assert_eq!(p.overlay_tapped(TAG), TapOutcome::Swallow);
    assert_eq!(p.phase(TAG), Some(Phase::Visible));
}

#[test]
fn no_overlay_lets_taps_through() {
    let mut p = presenter();
    p.present(
        request().options(PopoverOptions::new().dismiss_on_tap(false).show_overlay(false)),
    );
    p.pump();
    assert!(host_of(&p).overlays().is_empty());
    assert_eq!(p.overlay_tapped(TAG), TapOutcome::PassThrough);
    assert_eq!(p.overlay_tapped(Tag(99)), TapOutcome::PassThrough);
}

#[test]
fn hidden_overlay_still_dismisses() {
    let mut p = presenter();
    p.present(request().options(PopoverOptions::new().show_overlay(false)));
    p.pump();
    let overlays = host_of(&p).overlays();
    assert_eq!(overlays.len(), 1);
    assert!(!overlays[0].visible);
    assert_eq!(p.overlay_tapped(TAG), TapOutcome::Dismiss);
}

// ============================================================================
// Child screens
// ============================================================================

#[test]
fn attached_child_screen_is_shown_and_released() {
    let mut p = presenter();
    if let Some(host) = p.host_mut() {
        host.register_screen(ScreenId(4), ViewId(40));
    }
    p.attachments_mut().set_child(TRIGGER, ScreenId(4));
    p.present(Presentation::attached(TRIGGER, TAG));

    let instance = p.instance(TAG).expect("instance");
    assert_eq!(instance.content_root(), Some(ViewId(40)));
    let container = instance.popover_node().expect("container");
    assert_eq!(host_of(&p).attached_children(), &[(ScreenId(4), container)]);

    p.pump();
    p.dismiss(TAG);
    p.pump();
    assert!(host_of(&p).attached_children().is_empty());
    assert!(host_of(&p).calls().contains(&HostCall::Detach(ScreenId(4))));
}

#[test]
fn explicit_content_wins_over_recorded_child() {
    let mut p = presenter();
    p.attachments_mut().set_child(TRIGGER, ScreenId(4));
    p.present(request());
    assert_eq!(p.instance(TAG).and_then(|i| i.content_root()), Some(CONTENT));
    assert!(host_of(&p).attached_children().is_empty());
}

// ============================================================================
// Timeline-driven animation
// ============================================================================

#[test]
fn timeline_runner_drives_intermediate_values() {
    let mut p = Presenter::new(TimelineRunner::new()).with_host(host());
    p.present(request());

    drive(&mut p, Duration::from_millis(100), Duration::from_millis(50));
    let overlay_alpha = host_of(&p).overlays()[0].alpha;
    assert!((overlay_alpha - 0.5).abs() < 1e-4, "{overlay_alpha}");
    let scale = p.instance(TAG).expect("instance").layer().scale();
    assert!(scale > 0.0001 && scale <= 1.0, "{scale}");
    assert_eq!(p.phase(TAG), Some(Phase::AnimatingIn));

    drive(&mut p, Duration::from_millis(500), Duration::from_millis(50));
    assert_eq!(p.phase(TAG), Some(Phase::Visible));
    assert_eq!(p.instance(TAG).expect("instance").layer().scale(), 1.0);

    p.dismiss(TAG);
    drive(&mut p, Duration::from_millis(300), Duration::from_millis(100));
    assert!(!p.is_occupied(TAG));
    assert!(p.runner().is_idle());
    assert_eq!(host_of(&p).subview_count(), 0);
}

#[test]
fn scale_updates_keep_the_pivot_on_the_trigger() {
    let mut p = Presenter::new(TimelineRunner::new()).with_host(host());
    p.present(request());
    drive(&mut p, Duration::from_millis(150), Duration::from_millis(50));

    let layer = *p.instance(TAG).expect("instance").layer();
    let rendered = layer.rendered_rect();
    // Down: the pivot is on the top edge, directly under the arrow tip.
    assert!((rendered.min_y() - 140.0).abs() < 1e-6);
    let pivot_x = rendered.min_x() + layer.anchor_point().x * rendered.width();
    assert!((pivot_x - 190.0).abs() < 1e-6);
    assert!(
        host_of(&p)
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::UpdateLayer { scale, .. } if *scale > 0.0001 && *scale < 1.0))
    );
}

#[test]
fn underdamped_entrance_overshoots_then_settles() {
    let mut p = Presenter::new(TimelineRunner::new()).with_host(host());
    p.present(request().options(PopoverOptions::new().spring_damping(0.3)));
    drive(&mut p, Duration::from_millis(200), Duration::from_millis(10));

    let peak = host_of(&p)
        .calls()
        .iter()
        .filter_map(|c| match c {
            HostCall::UpdateLayer { scale, .. } => Some(*scale),
            _ => None,
        })
        .fold(0.0f64, f64::max);
    assert!(peak > 1.1, "peak scale {peak}");
    let alpha = host_of(&p).overlays()[0].alpha;
    assert!((0.0..=1.0).contains(&alpha));

    drive(&mut p, Duration::from_millis(400), Duration::from_millis(10));
    assert_eq!(p.phase(TAG), Some(Phase::Visible));
    assert_eq!(p.instance(TAG).expect("instance").layer().scale(), 1.0);
}

// ============================================================================
// Hit testing and scene export
// ============================================================================

#[test]
fn hit_test_follows_outline() {
    let mut p = presenter();
    p.present(request());
    p.pump();
    assert!(p.hit_test(TAG, Point::new(190.0, 200.0)));
    assert!(p.hit_test(TAG, Point::new(190.0, 145.0)), "arrow tip region");
    assert!(!p.hit_test(TAG, Point::new(150.0, 145.0)), "beside the arrow");
    assert!(!p.hit_test(TAG, Point::new(10.0, 10.0)));
    assert!(!p.hit_test(Tag(99), Point::new(190.0, 200.0)));
}

#[test]
fn scene_json_lists_overlay_then_popover() {
    let mut p = presenter();
    p.present(request());
    p.pump();
    let scene = host_of(&p).scene_json();
    let nodes = scene["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["kind"], "overlay");
    assert_eq!(nodes[1]["kind"], "popover");
    assert_eq!(nodes[1]["direction"], "Down");
    assert_eq!(nodes[1]["scale"], 1.0);
    assert!(nodes[1]["outline"].as_str().is_some_and(|s| s.starts_with('M')));
}
