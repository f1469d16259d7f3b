#![forbid(unsafe_code)]

//! The host screen seam.
//!
//! The presenter never owns views. It talks to the host through opaque
//! handles: triggers and content are [`ViewId`]s, child screens are
//! [`ScreenId`]s, and everything the presenter inserts comes back as a
//! [`NodeId`]. A handle that the host no longer recognizes is treated as a
//! vanished view.

use perch_core::geometry::{Insets, Rect};
use perch_core::layer::Layer;
use perch_render::outline::Outline;
use perch_render::overlay::OverlayDescriptor;

/// Opaque handle to a view in the host hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Non-owning handle to the view a popover points at.
pub type TriggerId = ViewId;

/// Opaque handle to a child screen that can be attached into a popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u64);

/// Handle to a subview the presenter inserted into the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Slot identifier on the host; one tag holds at most one popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub i64);

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// What a popover displays: exactly one of a view or a child screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Content {
    View(ViewId),
    Screen(ScreenId),
}

/// The popover container handed to the host for drawing.
#[derive(Debug, Clone)]
pub struct PopoverNode {
    pub tag: Tag,
    pub layer: Layer,
    /// Background mask and hit region, in popover-local coordinates.
    pub outline: Outline,
    pub content: Content,
    /// Content frame in popover-local coordinates.
    pub content_frame: Rect,
    /// Padding that keeps content clear of the arrow strip.
    pub body_insets: Insets,
    pub corner_radius: f64,
}

/// A subview inserted by the presenter.
#[derive(Debug, Clone)]
pub enum Node {
    Overlay(OverlayDescriptor),
    Popover(PopoverNode),
}

impl Node {
    /// The popover payload, if this is a popover container.
    pub fn as_popover(&self) -> Option<&PopoverNode> {
        match self {
            Node::Popover(popover) => Some(popover),
            Node::Overlay(_) => None,
        }
    }

    /// The overlay payload, if this is an overlay.
    pub fn as_overlay(&self) -> Option<&OverlayDescriptor> {
        match self {
            Node::Overlay(overlay) => Some(overlay),
            Node::Popover(_) => None,
        }
    }
}

/// A screen that can host popovers.
pub trait Host {
    /// Bounds of the host view in its own coordinates.
    fn bounds(&self) -> Rect;

    /// Frame of `view` converted into host coordinates, or `None` if the view
    /// is gone.
    fn frame_in_host(&self, view: ViewId) -> Option<Rect>;

    /// Number of direct subviews, including ones the presenter inserted.
    fn subview_count(&self) -> usize;

    /// Insert `node` at `index` in render order (0 is the back).
    fn insert_subview(&mut self, node: Node, index: usize) -> NodeId;

    /// Remove a node previously inserted; unknown handles are ignored.
    fn remove_subview(&mut self, node: NodeId);

    /// Push new layer geometry (position, pivot, scale) for a popover node.
    fn update_layer(&mut self, node: NodeId, layer: &Layer);

    /// Set the opacity of an overlay node.
    fn update_overlay_alpha(&mut self, node: NodeId, alpha: f32);

    /// Attach `screen` as a child whose root view lives inside `container`.
    ///
    /// Returns the child's root view, or `None` if the screen is unknown.
    fn attach_child(&mut self, screen: ScreenId, container: NodeId) -> Option<ViewId>;

    /// Run the child's detach lifecycle and drop it from the host.
    fn detach_child(&mut self, screen: ScreenId);
}
