use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::{Length, NodeId, Viewport, VisualState},
        error::{StageError, StageResult},
    },
    scene::selector::Selector,
};

/// Declarative description of a node to insert.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeSpec {
    /// Element tag (`section`, `div`, `span`...).
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Class list.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Offset from the parent's top (for sections: margin above the section).
    #[serde(default)]
    pub top: Length,
    /// Offset from the parent's left edge. `Percent` is relative to the parent width.
    #[serde(default)]
    pub left: Length,
    /// Box height. `Percent` is relative to the parent height.
    #[serde(default)]
    pub height: Length,
    /// Out of flow: a top-level fixed node is placed at `top` in viewport coordinates
    /// and takes no document space.
    #[serde(default)]
    pub fixed: bool,
}

fn default_tag() -> String {
    "div".to_string()
}

impl NodeSpec {
    /// A `div` with the given classes (space separated) and height.
    pub fn div(classes: &str, height: Length) -> Self {
        Self::tagged("div", classes, height)
    }

    /// A node with an explicit tag.
    pub fn tagged(tag: &str, classes: &str, height: Length) -> Self {
        Self {
            tag: tag.to_string(),
            classes: classes.split_whitespace().map(str::to_string).collect(),
            top: Length::Px(0.0),
            left: Length::Px(0.0),
            height,
            fixed: false,
        }
    }

    /// Builder-style top offset.
    pub fn at(mut self, top: Length) -> Self {
        self.top = top;
        self
    }

    /// Builder-style left offset.
    pub fn left(mut self, left: Length) -> Self {
        self.left = left;
        self
    }

    /// Take the node out of flow.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }
}

/// One node of the scene tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// Element tag, lowercase.
    pub tag: String,
    /// Class list.
    pub classes: Vec<String>,
    /// Parent node; `None` only for the document root.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Declared top offset.
    pub top: Length,
    /// Declared left offset.
    pub left: Length,
    /// Declared height.
    pub height: Length,
    /// Out of flow.
    pub fixed: bool,
    style: VisualState,
    pin_offset: f64,
    abs_top: f64,
    abs_height: f64,
    abs_left: f64,
    abs_width: f64,
}

impl Node {
    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Current visual state.
    pub fn style(&self) -> VisualState {
        self.style
    }

    /// Current pin displacement in px (0 when not pinned).
    pub fn pin_offset(&self) -> f64 {
        self.pin_offset
    }
}

/// In-memory document: a tree of nodes with a vertical flow layout.
///
/// Children of the document root are sections that stack vertically in order. Any
/// other node is positioned relative to its parent. Pin spacers registered for a node
/// grow the height of its top-level section, so they shift every later section.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    viewport: Viewport,
    pin_spacers: BTreeMap<NodeId, f64>,
    document_height: f64,
    layout_dirty: bool,
}

impl Scene {
    /// Empty document for the given viewport.
    pub fn new(viewport: Viewport) -> StageResult<Self> {
        viewport.validate()?;
        let root = Node {
            tag: "body".to_string(),
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
            top: Length::Px(0.0),
            left: Length::Px(0.0),
            height: Length::Px(0.0),
            fixed: false,
            style: VisualState::default(),
            pin_offset: 0.0,
            abs_top: 0.0,
            abs_height: 0.0,
            abs_left: 0.0,
            abs_width: viewport.width,
        };
        Ok(Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
            viewport,
            pin_spacers: BTreeMap::new(),
            document_height: 0.0,
            layout_dirty: true,
        })
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the viewport; layout is recomputed on the next [`Scene::layout`].
    pub fn set_viewport(&mut self, viewport: Viewport) -> StageResult<()> {
        viewport.validate()?;
        if viewport != self.viewport {
            self.viewport = viewport;
            self.layout_dirty = true;
        }
        Ok(())
    }

    /// Look up a live node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, including the document root.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// `true` if only the document root exists.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Append a child under `parent`. Ids are never reused.
    pub fn append(&mut self, parent: NodeId, spec: NodeSpec) -> StageResult<NodeId> {
        if !self.contains(parent) {
            return Err(StageError::validation(format!(
                "parent node {} does not exist",
                parent.0
            )));
        }
        if spec.tag.trim().is_empty() {
            return Err(StageError::validation("node tag must be non-empty"));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            tag: spec.tag.to_ascii_lowercase(),
            classes: spec.classes,
            parent: Some(parent),
            children: Vec::new(),
            top: spec.top,
            left: spec.left,
            height: spec.height,
            fixed: spec.fixed,
            style: VisualState::default(),
            pin_offset: 0.0,
            abs_top: 0.0,
            abs_height: 0.0,
            abs_left: 0.0,
            abs_width: 0.0,
        }));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        self.layout_dirty = true;
        Ok(id)
    }

    /// Remove `id` and its whole subtree. Removing a missing node is a no-op.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.contains(id) {
            return 0;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }

        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(cur.0 as usize).and_then(Option::take) {
                stack.extend(node.children);
                self.pin_spacers.remove(&cur);
                removed += 1;
            }
        }
        self.layout_dirty = true;
        removed
    }

    /// Nodes below `scope` (excluding `scope`) matching `selector`, in document order.
    pub fn query(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(node) = self.node(scope) else {
            return out;
        };
        let mut stack: Vec<NodeId> = node.children.iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            if selector.matches(self, cur) {
                out.push(cur);
            }
            if let Some(n) = self.node(cur) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// Document-wide query.
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query(self.root, selector)
    }

    /// `true` if `node` is `ancestor` or lies below it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(cur) = cursor {
            if cur == ancestor {
                return true;
            }
            cursor = self.node(cur).and_then(|n| n.parent);
        }
        false
    }

    /// The top-level section containing `id` (or `id` itself if it is one).
    pub fn section_of(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = id;
        loop {
            let parent = self.node(cursor)?.parent?;
            if parent == self.root {
                return Some(cursor);
            }
            cursor = parent;
        }
    }

    /// Current visual state of a node.
    pub fn style(&self, id: NodeId) -> Option<VisualState> {
        self.node(id).map(Node::style)
    }

    pub(crate) fn style_mut(&mut self, id: NodeId) -> Option<&mut VisualState> {
        self.node_mut(id).map(|n| &mut n.style)
    }

    pub(crate) fn set_pin_offset(&mut self, id: NodeId, offset: f64) {
        if let Some(n) = self.node_mut(id) {
            n.pin_offset = offset;
        }
    }

    /// Reserve `px` of flow space after `id` for a pinned range.
    pub(crate) fn set_pin_spacer(&mut self, id: NodeId, px: f64) {
        let px = px.max(0.0);
        if self.pin_spacers.get(&id) != Some(&px) {
            self.pin_spacers.insert(id, px);
            self.layout_dirty = true;
        }
    }

    pub(crate) fn clear_pin_spacer(&mut self, id: NodeId) {
        if self.pin_spacers.remove(&id).is_some() {
            self.layout_dirty = true;
        }
    }

    /// Whether geometry changed since the last layout pass.
    pub fn needs_layout(&self) -> bool {
        self.layout_dirty
    }

    /// Recompute absolute geometry for every node.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn layout(&mut self) {
        let vp = self.viewport;

        let mut section_spacer: BTreeMap<NodeId, f64> = BTreeMap::new();
        for (&id, &px) in &self.pin_spacers {
            if let Some(section) = self.section_of(id) {
                *section_spacer.entry(section).or_default() += px;
            }
        }

        let sections = self
            .node(self.root)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        let mut cursor = 0.0;
        for section in sections {
            let Some(node) = self.node_mut(section) else {
                continue;
            };
            let height = node.height.resolve(vp, vp.height).max(0.0);
            node.abs_height = height;
            node.abs_left = node.left.resolve(vp, vp.width);
            node.abs_width = vp.width;
            if node.fixed {
                node.abs_top = node.top.resolve(vp, vp.height);
            } else {
                let top = cursor + node.top.resolve(vp, vp.height);
                node.abs_top = top;
                cursor = top + height + section_spacer.get(&section).copied().unwrap_or(0.0);
            }
            self.layout_children(section);
        }

        self.document_height = cursor;
        if let Some(root) = self.node_mut(self.root) {
            root.abs_height = cursor;
            root.abs_width = vp.width;
        }
        self.layout_dirty = false;
        tracing::debug!(document_height = cursor, "layout");
    }

    fn layout_children(&mut self, parent: NodeId) {
        let vp = self.viewport;
        let mut stack = vec![parent];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.node(cur) else {
                continue;
            };
            let (ptop, pheight) = (node.abs_top, node.abs_height);
            let (pleft, pwidth) = (node.abs_left, node.abs_width);
            let children = node.children.clone();
            for child in children {
                if let Some(c) = self.node_mut(child) {
                    c.abs_top = ptop + c.top.resolve(vp, pheight);
                    c.abs_height = c.height.resolve(vp, pheight).max(0.0);
                    // boxes span their parent's width
                    c.abs_left = pleft + c.left.resolve(vp, pwidth);
                    c.abs_width = pwidth;
                    stack.push(child);
                }
            }
        }
    }

    /// Total scrollable content height, pin spacers included.
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Largest valid scroll position.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    /// Layout top of a node in document coordinates (ignores pinning and transforms).
    pub fn layout_top(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|n| n.abs_top)
    }

    /// Layout height of a node.
    pub fn layout_height(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|n| n.abs_height)
    }

    /// Layout left edge of a node, px from the viewport's left edge.
    pub fn layout_left(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|n| n.abs_left)
    }

    /// Layout width of a node.
    pub fn layout_width(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|n| n.abs_width)
    }

    /// Document-space top including the pin displacement of the node and its ancestors.
    pub fn visual_top(&self, id: NodeId) -> Option<f64> {
        let mut top = self.node(id)?.abs_top;
        let mut cursor = Some(id);
        while let Some(cur) = cursor {
            let n = self.node(cur)?;
            top += n.pin_offset;
            cursor = n.parent;
        }
        Some(top)
    }

    /// Serializable view of every live node below the root, in document order.
    pub fn snapshot(&self) -> SceneSnapshot {
        let mut nodes = Vec::new();
        let mut stack: Vec<NodeId> = self
            .node(self.root)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(cur) = stack.pop() {
            let Some(n) = self.node(cur) else {
                continue;
            };
            nodes.push(NodeSnapshot {
                id: cur,
                tag: n.tag.clone(),
                classes: n.classes.clone(),
                top: self.visual_top(cur).unwrap_or(n.abs_top),
                left: n.abs_left,
                height: n.abs_height,
                width: n.abs_width,
                style: n.style,
            });
            stack.extend(n.children.iter().rev().copied());
        }
        SceneSnapshot {
            document_height: self.document_height,
            nodes,
        }
    }
}

/// Point-in-time copy of the scene for hosts and traces.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneSnapshot {
    /// Document height at the time of the snapshot.
    pub document_height: f64,
    /// Live nodes in document order.
    pub nodes: Vec<NodeSnapshot>,
}

/// One node inside a [`SceneSnapshot`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NodeSnapshot {
    /// Node id.
    pub id: NodeId,
    /// Element tag.
    pub tag: String,
    /// Class list.
    pub classes: Vec<String>,
    /// Visual top in document coordinates.
    pub top: f64,
    /// Layout left edge.
    pub left: f64,
    /// Layout height.
    pub height: f64,
    /// Layout width.
    pub width: f64,
    /// Visual state.
    pub style: VisualState,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
