#![forbid(unsafe_code)]

//! One popover presentation and its lifecycle.
//!
//! ```text
//! Idle -> Configuring -> Placing -> AnimatingIn -> Visible -> AnimatingOut -> Detached
//! ```
//!
//! Each phase runs to completion before the next starts. The entrance and
//! exit are driven by animation completions delivered through
//! [`PopoverInstance::on_animation_complete`]; nothing blocks.
//!
//! # Invariants
//!
//! 1. An instance is shown at most once and dismissed at most once.
//! 2. The direction is resolved before any geometry is built and never
//!    changes afterwards.
//! 3. The overlay, when present, sits behind the popover in render order.
//! 4. Every handler fires at most once; `will_*` always precedes `did_*`.
//! 5. `Detached` releases every host node and child screen.

use std::fmt;
use std::time::Duration;

use perch_core::animation::Curve;
use perch_core::geometry::{Point, Rect, Size};
use perch_core::layer::Layer;
use perch_core::placement::{
    Direction, Placement, PlacementInput, arrow_anchor, compute_placement, plain_dialog_anchor,
};
use perch_render::outline::{Outline, build_outline};
use perch_render::overlay::{OverlayDescriptor, OverlayFill, TapOutcome, build_overlay};

use crate::attachments::DialogKind;
use crate::error::{ShowError, ShowResult};
use crate::host::{Content, Host, Node, NodeId, PopoverNode, Tag, TriggerId, ViewId};
use crate::options::PopoverStyle;
use crate::runner::{AnimationId, AnimationRequest, AnimationRunner, AnimationTarget};

/// Lifecycle phase of a [`PopoverInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Configuring,
    Placing,
    AnimatingIn,
    Visible,
    AnimatingOut,
    /// Terminal; the instance must not be reused.
    Detached,
}

/// Lifecycle milestone, mirrored by the [`Handlers`] callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopoverEvent {
    WillShow(Tag),
    DidShow(Tag),
    WillDismiss(Tag),
    DidDismiss(Tag),
}

type Callback = Box<dyn FnOnce()>;

/// Caller callbacks, each invoked at most once.
#[derive(Default)]
pub struct Handlers {
    will_show: Option<Callback>,
    did_show: Option<Callback>,
    will_dismiss: Option<Callback>,
    did_dismiss: Option<Callback>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("will_show", &self.will_show.is_some())
            .field("did_show", &self.did_show.is_some())
            .field("will_dismiss", &self.will_dismiss.is_some())
            .field("did_dismiss", &self.did_dismiss.is_some())
            .finish()
    }
}

impl Handlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called right before the entrance animation starts.
    #[must_use]
    pub fn on_will_show(mut self, f: impl FnOnce() + 'static) -> Self {
        self.will_show = Some(Box::new(f));
        self
    }

    /// Called when the entrance animation completes.
    #[must_use]
    pub fn on_did_show(mut self, f: impl FnOnce() + 'static) -> Self {
        self.did_show = Some(Box::new(f));
        self
    }

    /// Called right before the exit animation starts.
    #[must_use]
    pub fn on_will_dismiss(mut self, f: impl FnOnce() + 'static) -> Self {
        self.will_dismiss = Some(Box::new(f));
        self
    }

    /// Called after the popover has been removed from the host.
    #[must_use]
    pub fn on_did_dismiss(mut self, f: impl FnOnce() + 'static) -> Self {
        self.did_dismiss = Some(Box::new(f));
        self
    }

    fn fire(slot: &mut Option<Callback>) {
        if let Some(f) = slot.take() {
            f();
        }
    }
}

/// Everything resolved before placement: content, size, kind, style.
#[derive(Debug, Clone, PartialEq)]
pub struct Setup {
    pub content: Content,
    pub content_size: Size,
    pub dialog_kind: DialogKind,
    pub style: PopoverStyle,
    pub min_scale: f64,
}

/// Allocates animation ids for a presenter.
#[derive(Debug, Default)]
pub struct AnimationIds {
    next: u64,
}

impl AnimationIds {
    pub fn next_id(&mut self) -> AnimationId {
        self.next += 1;
        AnimationId(self.next)
    }
}

/// A single show/dismiss cycle for one tag.
#[derive(Debug)]
pub struct PopoverInstance {
    tag: Tag,
    trigger: TriggerId,
    phase: Phase,
    setup: Option<Setup>,
    direction: Direction,
    trigger_frame: Option<Rect>,
    placement: Option<Placement>,
    layer: Layer,
    outline: Option<Outline>,
    overlay: Option<OverlayDescriptor>,
    popover_node: Option<NodeId>,
    overlay_node: Option<NodeId>,
    content_root: Option<ViewId>,
    scale_animation: Option<AnimationId>,
    in_flight: Vec<(AnimationId, AnimationTarget)>,
    dismiss_pending: bool,
    handlers: Handlers,
    events: Vec<PopoverEvent>,
}

impl PopoverInstance {
    /// A fresh instance in [`Phase::Idle`].
    pub fn new(tag: Tag, trigger: TriggerId, handlers: Handlers) -> Self {
        Self {
            tag,
            trigger,
            phase: Phase::Idle,
            setup: None,
            direction: Direction::Auto,
            trigger_frame: None,
            placement: None,
            layer: Layer::default(),
            outline: None,
            overlay: None,
            popover_node: None,
            overlay_node: None,
            content_root: None,
            scale_animation: None,
            in_flight: Vec::new(),
            dismiss_pending: false,
            handlers,
            events: Vec::new(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn trigger(&self) -> TriggerId {
        self.trigger
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Resolved direction; `Auto` until placement.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn style(&self) -> Option<&PopoverStyle> {
        self.setup.as_ref().map(|s| &s.style)
    }

    pub fn content(&self) -> Option<Content> {
        self.setup.as_ref().map(|s| s.content)
    }

    /// Trigger frame in host coordinates, captured at placement.
    pub fn trigger_frame(&self) -> Option<Rect> {
        self.trigger_frame
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Current layer, including the animated scale.
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    pub fn overlay(&self) -> Option<&OverlayDescriptor> {
        self.overlay.as_ref()
    }

    /// Host node of the popover container while attached.
    pub fn popover_node(&self) -> Option<NodeId> {
        self.popover_node
    }

    /// Host node of the overlay while attached.
    pub fn overlay_node(&self) -> Option<NodeId> {
        self.overlay_node
    }

    /// Root view of the content: the supplied view or the child's root.
    pub fn content_root(&self) -> Option<ViewId> {
        self.content_root
    }

    /// Whether `id` belongs to this instance.
    pub fn owns(&self, id: AnimationId) -> bool {
        self.in_flight.iter().any(|(owned, _)| *owned == id)
    }

    /// Take queued lifecycle events.
    pub fn drain_events(&mut self) -> Vec<PopoverEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run Configuring, Placing, and start AnimatingIn.
    ///
    /// On failure nothing stays attached to the host and the instance is
    /// [`Phase::Detached`].
    pub fn show<H, R>(
        &mut self,
        setup: Setup,
        host: &mut H,
        runner: &mut R,
        ids: &mut AnimationIds,
    ) -> ShowResult<()>
    where
        H: Host + ?Sized,
        R: AnimationRunner + ?Sized,
    {
        if self.phase != Phase::Idle {
            tracing::debug!(tag = self.tag.0, phase = ?self.phase, "show rejected");
            return Err(ShowError::AlreadyShown);
        }
        let _span = tracing::debug_span!("popover_show", tag = self.tag.0).entered();

        self.configure(setup);
        if let Err(err) = self.place(host) {
            self.rollback(host);
            return Err(err);
        }
        self.animate_in(host, runner, ids);
        Ok(())
    }

    fn configure(&mut self, setup: Setup) {
        self.transition(Phase::Configuring);
        let mut setup = setup;
        if setup.dialog_kind == DialogKind::Plain {
            setup.style.arrow_size = Size::ZERO;
            setup.style.direction = Direction::Down;
        }
        self.direction = setup.style.direction;
        self.setup = Some(setup);
    }

    fn place<H: Host + ?Sized>(&mut self, host: &mut H) -> ShowResult<()> {
        self.transition(Phase::Placing);
        let Some(setup) = self.setup.clone() else {
            return Err(ShowError::MissingContent);
        };
        let Some(trigger_frame) = host.frame_in_host(self.trigger) else {
            tracing::warn!(tag = self.tag.0, trigger = self.trigger.0, "trigger vanished before placement");
            return Err(ShowError::TriggerGone);
        };
        let host_bounds = host.bounds();
        let style = &setup.style;
        let size = setup.content_size;

        let (anchor, highlight) = match setup.dialog_kind {
            DialogKind::Arrow => {
                self.direction
                    .resolve(trigger_frame, size.height, style.arrow_size.height, host_bounds);
                (arrow_anchor(trigger_frame, self.direction), true)
            }
            DialogKind::Plain => (plain_dialog_anchor(host_bounds, size), false),
        };

        let placement = compute_placement(PlacementInput {
            anchor,
            content_size: size,
            arrow_size: style.arrow_size,
            side_edge: style.side_edge,
            host_bounds,
            direction: self.direction,
        });
        let outline = build_outline(
            size,
            self.direction,
            style.arrow_size,
            style.corner_radius,
            placement.apex,
        )
        .with_fill(style.content_color);
        let fill = style
            .overlay_blur
            .map_or(OverlayFill::Color(style.overlay_color), OverlayFill::Blur);
        let overlay = build_overlay(
            host_bounds,
            style.show_overlay,
            fill,
            highlight.then(|| trigger_frame.expanded(style.highlight_corner_radius)),
            style.highlight_corner_radius,
            style.dismiss_on_tap,
        );

        if let Some(overlay) = &overlay {
            self.overlay_node = Some(host.insert_subview(Node::Overlay(overlay.clone()), 0));
        }
        let index = host.subview_count();
        let node = host.insert_subview(
            Node::Popover(PopoverNode {
                tag: self.tag,
                layer: placement.layer,
                outline: outline.clone(),
                content: setup.content,
                content_frame: placement.content_frame,
                body_insets: placement.body_insets,
                corner_radius: style.corner_radius,
            }),
            index,
        );
        self.popover_node = Some(node);

        self.content_root = match setup.content {
            Content::View(view) => Some(view),
            Content::Screen(screen) => match host.attach_child(screen, node) {
                Some(root) => Some(root),
                None => {
                    tracing::debug!(tag = self.tag.0, screen = screen.0, "child screen unavailable");
                    return Err(ShowError::MissingContent);
                }
            },
        };

        tracing::debug!(
            tag = self.tag.0,
            direction = ?self.direction,
            x = placement.frame().min_x(),
            y = placement.frame().min_y(),
            width = placement.frame().width(),
            height = placement.frame().height(),
            "popover placed"
        );
        self.trigger_frame = Some(trigger_frame);
        self.layer = placement.layer;
        self.placement = Some(placement);
        self.outline = Some(outline);
        self.overlay = overlay;
        Ok(())
    }

    fn animate_in<H, R>(&mut self, host: &mut H, runner: &mut R, ids: &mut AnimationIds)
    where
        H: Host + ?Sized,
        R: AnimationRunner + ?Sized,
    {
        let Some(setup) = self.setup.as_ref() else {
            return;
        };
        let style = setup.style.clone();
        let min_scale = setup.min_scale;
        let delay = style.entrance_delay;

        self.transition(Phase::AnimatingIn);
        self.layer.set_scale(min_scale);
        if let Some(node) = self.popover_node {
            host.update_layer(node, &self.layer);
        }
        self.events.push(PopoverEvent::WillShow(self.tag));
        Handlers::fire(&mut self.handlers.will_show);

        let curve = Curve::Spring {
            damping: style.spring_damping,
            velocity: style.spring_velocity,
        };
        self.scale_animation = Some(self.request(
            runner,
            ids,
            AnimationTarget::PopoverScale { from: min_scale, to: 1.0 },
            style.animation_in,
            delay,
            curve,
        ));
        if self.overlay_node.is_some() {
            self.request(
                runner,
                ids,
                AnimationTarget::OverlayAlpha { from: 0.0, to: 1.0 },
                style.animation_in / 3,
                delay,
                Curve::Linear,
            );
        }
    }

    /// Start the exit. Only honoured from [`Phase::Visible`].
    pub fn dismiss<R>(&mut self, runner: &mut R, ids: &mut AnimationIds) -> bool
    where
        R: AnimationRunner + ?Sized,
    {
        if self.phase != Phase::Visible {
            tracing::debug!(tag = self.tag.0, phase = ?self.phase, "dismiss ignored");
            return false;
        }
        let Some(setup) = self.setup.as_ref() else {
            return false;
        };
        let duration = setup.style.animation_out;
        let min_scale = setup.min_scale;

        self.transition(Phase::AnimatingOut);
        self.events.push(PopoverEvent::WillDismiss(self.tag));
        Handlers::fire(&mut self.handlers.will_dismiss);

        if self.overlay_node.is_some() {
            let alpha = self.overlay.as_ref().map_or(1.0, |o| f64::from(o.alpha));
            self.request(
                runner,
                ids,
                AnimationTarget::OverlayAlpha { from: alpha, to: 0.0 },
                duration,
                Duration::ZERO,
                Curve::EaseInOut,
            );
        }
        self.scale_animation = Some(self.request(
            runner,
            ids,
            AnimationTarget::PopoverScale {
                from: self.layer.scale(),
                to: min_scale,
            },
            duration,
            Duration::ZERO,
            Curve::EaseInOut,
        ));
        true
    }

    /// Remember a dismiss that arrived during the entrance.
    ///
    /// Returns `false` outside [`Phase::AnimatingIn`].
    pub fn defer_dismiss(&mut self) -> bool {
        if self.phase != Phase::AnimatingIn {
            return false;
        }
        tracing::debug!(tag = self.tag.0, "dismiss deferred until visible");
        self.dismiss_pending = true;
        true
    }

    /// Take the deferred dismiss once the entrance has finished.
    pub fn take_deferred_dismiss(&mut self) -> bool {
        if self.phase == Phase::Visible && self.dismiss_pending {
            self.dismiss_pending = false;
            return true;
        }
        false
    }

    /// Outcome of a tap on this instance's overlay.
    pub fn tap(&self) -> TapOutcome {
        match (&self.overlay, self.overlay_node) {
            (Some(overlay), Some(_)) => overlay.tap(),
            _ => TapOutcome::PassThrough,
        }
    }

    /// Whether `point` (host coordinates) hits the popover outline.
    pub fn hit_test(&self, point: Point) -> bool {
        let (Some(outline), Some(placement)) = (&self.outline, &self.placement) else {
            return false;
        };
        if self.popover_node.is_none() {
            return false;
        }
        let frame = self.layer.rendered_rect();
        let scale = self.layer.scale();
        if scale <= 0.0 {
            return false;
        }
        let local = Point::new(
            (point.x - frame.min_x()) / scale - placement.content_frame.min_x(),
            (point.y - frame.min_y()) / scale - placement.content_frame.min_y(),
        );
        outline.contains(local)
    }

    /// Push an intermediate animation value to the host.
    pub fn apply_sample<H: Host + ?Sized>(&mut self, target: AnimationTarget, value: f64, host: &mut H) {
        match target {
            AnimationTarget::PopoverScale { .. } => {
                self.layer.set_scale(value);
                if let Some(node) = self.popover_node {
                    host.update_layer(node, &self.layer);
                }
            }
            AnimationTarget::OverlayAlpha { .. } => {
                let alpha = (value as f32).clamp(0.0, 1.0);
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.alpha = alpha;
                }
                if let Some(node) = self.overlay_node {
                    host.update_overlay_alpha(node, alpha);
                }
            }
        }
    }

    /// Handle the completion of an animation this instance requested.
    ///
    /// Returns `false` for ids it does not own.
    pub fn on_animation_complete<H: Host + ?Sized>(&mut self, id: AnimationId, host: &mut H) -> bool {
        let Some(index) = self.in_flight.iter().position(|(owned, _)| *owned == id) else {
            return false;
        };
        let (_, target) = self.in_flight.remove(index);
        if self.phase == Phase::Detached {
            return true;
        }
        self.apply_sample(target, target.end(), host);

        if self.scale_animation != Some(id) {
            return true;
        }
        self.scale_animation = None;
        match self.phase {
            Phase::AnimatingIn => {
                self.transition(Phase::Visible);
                self.events.push(PopoverEvent::DidShow(self.tag));
                Handlers::fire(&mut self.handlers.did_show);
            }
            Phase::AnimatingOut => self.teardown(host),
            phase => {
                tracing::warn!(tag = self.tag.0, ?phase, "scale completion outside an animation phase");
            }
        }
        true
    }

    fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.release(host);
        self.layer.set_scale(1.0);
        self.transition(Phase::Detached);
        self.events.push(PopoverEvent::DidDismiss(self.tag));
        Handlers::fire(&mut self.handlers.did_dismiss);
    }

    fn rollback<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.release(host);
        self.transition(Phase::Detached);
    }

    fn release<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let (Some(Content::Screen(screen)), Some(_)) = (self.content(), self.content_root) {
            host.detach_child(screen);
        }
        if let Some(node) = self.popover_node.take() {
            host.remove_subview(node);
        }
        if let Some(node) = self.overlay_node.take() {
            host.remove_subview(node);
        }
        self.content_root = None;
    }

    fn request<R: AnimationRunner + ?Sized>(
        &mut self,
        runner: &mut R,
        ids: &mut AnimationIds,
        target: AnimationTarget,
        duration: Duration,
        delay: Duration,
        curve: Curve,
    ) -> AnimationId {
        let id = ids.next_id();
        let node = match target {
            AnimationTarget::PopoverScale { .. } => self.popover_node,
            AnimationTarget::OverlayAlpha { .. } => self.overlay_node,
        };
        self.in_flight.push((id, target));
        runner.animate(AnimationRequest {
            id,
            tag: self.tag,
            node: node.unwrap_or(NodeId(0)),
            target,
            duration,
            delay,
            curve,
        });
        id
    }

    fn transition(&mut self, next: Phase) {
        tracing::debug!(tag = self.tag.0, from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }
}
