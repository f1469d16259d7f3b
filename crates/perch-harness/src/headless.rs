#![forbid(unsafe_code)]

//! In-memory host screen.
//!
//! Views are plain frames in host coordinates. Child screens are registered
//! with the root view they expose once attached. Every call the presenter
//! makes is recorded in order so tests can assert on sequencing.

use std::collections::HashMap;

use perch_core::geometry::Rect;
use perch_core::layer::Layer;
use perch_render::overlay::OverlayDescriptor;
use perch_runtime::host::{Host, Node, NodeId, PopoverNode, ScreenId, ViewId};
use serde_json::{Value, json};

/// One call made by the presenter into the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCall {
    Insert { node: NodeId, index: usize },
    Remove(NodeId),
    UpdateLayer { node: NodeId, scale: f64 },
    OverlayAlpha { node: NodeId, alpha: f32 },
    Attach { screen: ScreenId, container: NodeId },
    Detach(ScreenId),
}

/// A host screen that lives entirely in memory.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    bounds: Rect,
    views: HashMap<ViewId, Rect>,
    screens: HashMap<ScreenId, ViewId>,
    attached: Vec<(ScreenId, NodeId)>,
    nodes: Vec<(NodeId, Node)>,
    next_node: u64,
    calls: Vec<HostCall>,
}

impl HeadlessHost {
    /// An empty host of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            views: HashMap::new(),
            screens: HashMap::new(),
            attached: Vec::new(),
            nodes: Vec::new(),
            next_node: 0,
            calls: Vec::new(),
        }
    }

    /// Place a view at `frame` (host coordinates).
    #[must_use]
    pub fn with_view(mut self, view: ViewId, frame: Rect) -> Self {
        self.add_view(view, frame);
        self
    }

    pub fn add_view(&mut self, view: ViewId, frame: Rect) {
        self.views.insert(view, frame);
    }

    /// Drop a view, as if it was removed from the hierarchy.
    pub fn remove_view(&mut self, view: ViewId) {
        self.views.remove(&view);
    }

    /// Make `screen` attachable; its content appears as `root`.
    pub fn register_screen(&mut self, screen: ScreenId, root: ViewId) {
        self.screens.insert(screen, root);
    }

    /// Inserted nodes in render order, back to front.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|(n, _)| *n == id).map(|(_, node)| node)
    }

    /// Render-order index of `id`.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|(n, _)| *n == id)
    }

    pub fn overlays(&self) -> Vec<&OverlayDescriptor> {
        self.nodes.iter().filter_map(|(_, n)| n.as_overlay()).collect()
    }

    pub fn popovers(&self) -> Vec<&PopoverNode> {
        self.nodes.iter().filter_map(|(_, n)| n.as_popover()).collect()
    }

    /// Screens currently attached, with their container node.
    pub fn attached_children(&self) -> &[(ScreenId, NodeId)] {
        &self.attached
    }

    /// Every call recorded so far.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// The scene as JSON, for snapshots and debugging.
    pub fn scene_json(&self) -> Value {
        let nodes: Vec<Value> = self
            .nodes
            .iter()
            .map(|(id, node)| match node {
                Node::Overlay(o) => json!({
                    "id": id.0,
                    "kind": "overlay",
                    "visible": o.visible,
                    "alpha": o.alpha,
                    "dismiss_on_tap": o.dismiss_on_tap,
                    "cutout": o.cutout.map(|c| rect_json(c.rect)),
                }),
                Node::Popover(p) => json!({
                    "id": id.0,
                    "kind": "popover",
                    "tag": p.tag.0,
                    "frame": rect_json(p.layer.frame()),
                    "scale": p.layer.scale(),
                    "pivot": [p.layer.anchor_point().x, p.layer.anchor_point().y],
                    "direction": format!("{:?}", p.outline.direction()),
                    "outline": p.outline.to_svg(),
                }),
            })
            .collect();
        json!({
            "bounds": rect_json(self.bounds),
            "nodes": nodes,
            "attached": self.attached.iter().map(|(s, n)| json!([s.0, n.0])).collect::<Vec<_>>(),
        })
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|(n, _)| *n == id)
            .map(|(_, node)| node)
    }
}

fn rect_json(r: Rect) -> Value {
    json!([r.min_x(), r.min_y(), r.width(), r.height()])
}

impl Host for HeadlessHost {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn frame_in_host(&self, view: ViewId) -> Option<Rect> {
        self.views.get(&view).copied()
    }

    fn subview_count(&self) -> usize {
        self.nodes.len()
    }

    fn insert_subview(&mut self, node: Node, index: usize) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, (id, node));
        self.calls.push(HostCall::Insert { node: id, index });
        id
    }

    fn remove_subview(&mut self, node: NodeId) {
        self.nodes.retain(|(id, _)| *id != node);
        self.calls.push(HostCall::Remove(node));
    }

    fn update_layer(&mut self, node: NodeId, layer: &Layer) {
        if let Some(Node::Popover(popover)) = self.node_mut(node) {
            popover.layer = *layer;
        }
        self.calls.push(HostCall::UpdateLayer {
            node,
            scale: layer.scale(),
        });
    }

    fn update_overlay_alpha(&mut self, node: NodeId, alpha: f32) {
        if let Some(Node::Overlay(overlay)) = self.node_mut(node) {
            overlay.alpha = alpha;
        }
        self.calls.push(HostCall::OverlayAlpha { node, alpha });
    }

    fn attach_child(&mut self, screen: ScreenId, container: NodeId) -> Option<ViewId> {
        let root = self.screens.get(&screen).copied()?;
        self.attached.push((screen, container));
        self.calls.push(HostCall::Attach { screen, container });
        Some(root)
    }

    fn detach_child(&mut self, screen: ScreenId) {
        self.attached.retain(|(s, _)| *s != screen);
        self.calls.push(HostCall::Detach(screen));
    }
}
