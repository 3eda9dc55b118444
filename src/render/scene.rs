use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{LabelTarget, LayerHandlers, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::BrushTarget;
use crate::render::{
    Color, PathCommand, PathData, TextAnchor, TextBaseline, plan_reconciliation,
};

/// Stable identifier of a scene node; never reused within one scene.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Path {
        d: PathData,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        anchor: TextAnchor,
        baseline: TextBaseline,
        /// Degrees, clockwise about `(x, y)`.
        rotate: f64,
        font_size: f64,
    },
    /// Clip region referenced by other nodes; never painted.
    ClipRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl NodeKind {
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn text(x: f64, y: f64, content: impl Into<String>, font_size: f64) -> Self {
        Self::Text {
            x,
            y,
            content: content.into(),
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            rotate: 0.0,
            font_size,
        }
    }

    fn validate(&self) -> ChartResult<()> {
        let finite = match self {
            Self::Group => true,
            Self::Path { d } => return d.validate(),
            Self::Rect {
                x,
                y,
                width,
                height,
            }
            | Self::ClipRect {
                x,
                y,
                width,
                height,
            } => {
                x.is_finite()
                    && y.is_finite()
                    && width.is_finite()
                    && height.is_finite()
                    && *width >= 0.0
                    && *height >= 0.0
            }
            Self::Text {
                x,
                y,
                rotate,
                font_size,
                ..
            } => x.is_finite() && y.is_finite() && rotate.is_finite() && *font_size > 0.0,
        };
        if finite {
            Ok(())
        } else {
            Err(ChartError::InvalidData(
                "scene node geometry must be finite and non-negative".to_owned(),
            ))
        }
    }
}

/// Inline paint attributes; everything a backend needs without a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

impl NodeStyle {
    #[must_use]
    pub fn stroked(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// What a node stands for, used to route pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeDatum {
    #[default]
    None,
    Row {
        layer: usize,
        row: usize,
    },
    Label(LabelTarget),
    Brush(BrushTarget),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub class: String,
    pub key: Option<String>,
    pub kind: NodeKind,
    pub style: NodeStyle,
    pub translate: Option<(f64, f64)>,
    pub clip: Option<NodeId>,
    pub title: Option<String>,
    pub datum: NodeDatum,
    pub handlers: LayerHandlers,
    children: Vec<NodeId>,
}

impl SceneNode {
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        match self.datum {
            NodeDatum::None => false,
            NodeDatum::Row { .. } => !self.handlers.is_empty(),
            NodeDatum::Label(_) | NodeDatum::Brush(_) => true,
        }
    }
}

/// Structural copy of one node, comparable across renders.
///
/// Ids are left out: overlays are recreated on every render by contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub depth: usize,
    pub class: String,
    pub key: Option<String>,
    pub kind: NodeKind,
    pub style: NodeStyle,
    pub translate: Option<(f64, f64)>,
    pub clipped: bool,
    pub title: Option<String>,
    pub datum: NodeDatum,
}

/// Depth-first structural snapshot of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub viewport: Viewport,
    pub nodes: Vec<NodeSnapshot>,
}

impl SceneSnapshot {
    #[must_use]
    pub fn count_class(&self, class: &str) -> usize {
        self.nodes
            .iter()
            .filter(|node| has_class(&node.class, class))
            .count()
    }
}

/// Retained node tree with stable ids.
///
/// Created once per chart and reused across renders; only the render pass
/// mutates it.
#[derive(Debug, Clone)]
pub struct Scene {
    viewport: Viewport,
    root: NodeId,
    nodes: IndexMap<NodeId, SceneNode>,
    next_id: u64,
}

pub const ROOT_CLASS: &str = "statchart-root";

impl Scene {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let root = NodeId(0);
        let mut nodes = IndexMap::new();
        nodes.insert(root, new_node(root, None, ROOT_CLASS, None, NodeKind::Group));
        Self {
            viewport,
            root,
            nodes,
            next_id: 1,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    #[must_use]
    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        self.nodes
            .get(&parent)
            .map_or(&[], |node| node.children.as_slice())
    }

    /// Appends a new child node.
    pub fn append(&mut self, parent: NodeId, class: &str, kind: NodeKind) -> NodeId {
        self.append_keyed(parent, class, None, kind)
    }

    fn append_keyed(
        &mut self,
        parent: NodeId,
        class: &str,
        key: Option<String>,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes
            .insert(id, new_node(id, Some(parent), class, key, kind));
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        id
    }

    /// First direct child of `parent` carrying `class`.
    #[must_use]
    pub fn find_child(&self, parent: NodeId, class: &str) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|id| {
            self.nodes
                .get(id)
                .is_some_and(|node| matches_class(&node.class, class))
        })
    }

    /// Returns the singleton group `class` under `parent`, creating it once.
    pub fn ensure_group(&mut self, parent: NodeId, class: &str) -> NodeId {
        match self.find_child(parent, class) {
            Some(id) => id,
            None => self.append(parent, class, NodeKind::Group),
        }
    }

    /// Direct children of `parent` carrying `class`, in paint order.
    #[must_use]
    pub fn children_with_class(&self, parent: NodeId, class: &str) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|node| matches_class(&node.class, class))
            })
            .collect()
    }

    /// Matches the `class` children of `parent` against `keys`.
    ///
    /// Exiting nodes are removed with their subtrees, entering keys get a new
    /// node of `kind`, and updated nodes keep their id. The returned ids line
    /// up with `keys`; the class children are re-ordered to match, starting
    /// where the first of them already sits among their siblings.
    pub fn reconcile_children<K: AsRef<str>>(
        &mut self,
        parent: NodeId,
        class: &str,
        keys: &[K],
        kind: NodeKind,
    ) -> Vec<NodeId> {
        let existing = self.children_with_class(parent, class);
        let previous_keys: Vec<String> = existing
            .iter()
            .map(|id| {
                self.nodes
                    .get(id)
                    .and_then(|node| node.key.clone())
                    .unwrap_or_default()
            })
            .collect();
        let plan = plan_reconciliation(&previous_keys, keys);

        for index in &plan.exit {
            self.remove(existing[*index]);
        }

        let mut ordered: Vec<Option<NodeId>> = vec![None; keys.len()];
        for (previous, next) in &plan.update {
            ordered[*next] = Some(existing[*previous]);
        }
        for next in &plan.enter {
            let key = keys[*next].as_ref().to_owned();
            ordered[*next] = Some(self.append_keyed(parent, class, Some(key), kind.clone()));
        }
        let ordered: Vec<NodeId> = ordered.into_iter().flatten().collect();

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            let insert_at = parent_node
                .children
                .iter()
                .take_while(|id| !ordered.contains(id))
                .count();
            parent_node.children.retain(|id| !ordered.contains(id));
            parent_node
                .children
                .splice(insert_at..insert_at, ordered.iter().copied());
        }
        ordered
    }

    /// Removes `id` and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        let parent = self.nodes.get(&id).and_then(|node| node.parent);
        if let Some(parent_node) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent_node.children.retain(|child| *child != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.shift_remove(&current) {
                stack.extend(node.children);
            }
        }
    }

    /// Removes the singleton `class` child of `parent`, if drawn.
    pub fn remove_child(&mut self, parent: NodeId, class: &str) {
        if let Some(id) = self.find_child(parent, class) {
            self.remove(id);
        }
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Full teardown back to an empty root.
    pub fn clear(&mut self) {
        self.clear_children(self.root);
    }

    /// Depth-first walk in paint order, yielding `(node, depth)`.
    #[must_use]
    pub fn walk(&self) -> Vec<(&SceneNode, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, 0)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push((node, depth));
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            viewport: self.viewport,
            nodes: self
                .walk()
                .into_iter()
                .map(|(node, depth)| NodeSnapshot {
                    depth,
                    class: node.class.clone(),
                    key: node.key.clone(),
                    kind: node.kind.clone(),
                    style: node.style,
                    translate: node.translate,
                    clipped: node.clip.is_some(),
                    title: node.title.clone(),
                    datum: node.datum,
                })
                .collect(),
        }
    }

    /// Number of nodes whose class list contains `class`.
    #[must_use]
    pub fn count_class(&self, class: &str) -> usize {
        self.nodes
            .values()
            .filter(|node| has_class(&node.class, class))
            .count()
    }

    #[must_use]
    pub fn nodes_with_class(&self, class: &str) -> Vec<&SceneNode> {
        self.walk()
            .into_iter()
            .map(|(node, _)| node)
            .filter(|node| has_class(&node.class, class))
            .collect()
    }

    /// Sum of the translations of `id` and all its ancestors.
    #[must_use]
    pub fn absolute_offset(&self, id: NodeId) -> (f64, f64) {
        let mut offset = (0.0, 0.0);
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(&id)) {
            if let Some((dx, dy)) = node.translate {
                offset.0 += dx;
                offset.1 += dy;
            }
            current = node.parent;
        }
        offset
    }

    /// Centre of the node's geometry in viewport pixels.
    #[must_use]
    pub fn node_center(&self, id: NodeId) -> Option<(f64, f64)> {
        let (x0, y0, x1, y1) = node_bounds(&self.nodes.get(&id)?.kind)?;
        let (dx, dy) = self.absolute_offset(id);
        Some(((x0 + x1) / 2.0 + dx, (y0 + y1) / 2.0 + dy))
    }

    /// Topmost interactive node whose geometry covers `(x, y)`.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        self.hit_test_matching(x, y, |_| true)
    }

    /// Like [`Scene::hit_test`], skipping interactive nodes `accept` rejects.
    #[must_use]
    pub fn hit_test_matching(
        &self,
        x: f64,
        y: f64,
        accept: impl Fn(&SceneNode) -> bool,
    ) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .rev()
            .map(|(node, _)| node)
            .filter(|node| node.is_interactive() && accept(node))
            .find(|node| {
                let (dx, dy) = self.absolute_offset(node.id);
                node_bounds(&node.kind)
                    .is_some_and(|(x0, y0, x1, y1)| {
                        x >= x0 + dx && x <= x1 + dx && y >= y0 + dy && y <= y1 + dy
                    })
            })
            .map(|node| node.id)
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.viewport.validate()?;
        for node in self.nodes.values() {
            node.kind.validate()?;
            if let Some(color) = node.style.fill {
                color.validate()?;
            }
            if let Some(color) = node.style.stroke {
                color.validate()?;
            }
        }
        Ok(())
    }
}

/// `class` attributes hold space-separated class lists.
#[must_use]
pub fn has_class(classes: &str, class: &str) -> bool {
    classes.split_whitespace().any(|item| item == class)
}

/// Exact class-list match, or membership of a single class.
fn matches_class(classes: &str, class: &str) -> bool {
    classes == class || has_class(classes, class)
}

fn new_node(
    id: NodeId,
    parent: Option<NodeId>,
    class: &str,
    key: Option<String>,
    kind: NodeKind,
) -> SceneNode {
    SceneNode {
        id,
        parent,
        class: class.to_owned(),
        key,
        kind,
        style: NodeStyle::default(),
        translate: None,
        clip: None,
        title: None,
        datum: NodeDatum::None,
        handlers: LayerHandlers::default(),
        children: Vec::new(),
    }
}

fn node_bounds(kind: &NodeKind) -> Option<(f64, f64, f64, f64)> {
    match kind {
        NodeKind::Rect {
            x,
            y,
            width,
            height,
        } => Some((*x, *y, x + width, y + height)),
        NodeKind::Path { d } => {
            let mut bounds: Option<(f64, f64, f64, f64)> = None;
            for command in d.commands() {
                let point = match *command {
                    PathCommand::MoveTo(x, y)
                    | PathCommand::LineTo(x, y) => (x, y),
                    PathCommand::ArcTo { radius, x, y } => {
                        // Arcs may bulge past their end points by up to the radius.
                        let (x0, y0, x1, y1) = bounds.unwrap_or((x, y, x, y));
                        bounds = Some((
                            x0.min(x - radius),
                            y0.min(y - radius),
                            x1.max(x + radius),
                            y1.max(y + radius),
                        ));
                        continue;
                    }
                    PathCommand::Close => continue,
                };
                let (x0, y0, x1, y1) = bounds.unwrap_or((point.0, point.1, point.0, point.1));
                bounds = Some((
                    x0.min(point.0),
                    y0.min(point.1),
                    x1.max(point.0),
                    y1.max(point.1),
                ));
            }
            bounds
        }
        NodeKind::Group | NodeKind::Text { .. } | NodeKind::ClipRect { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeDatum, NodeKind, Scene};
    use crate::core::{LabelTarget, Viewport};

    #[test]
    fn reconcile_keeps_ids_for_matching_keys() {
        let mut scene = Scene::new(Viewport::new(100, 100));
        let root = scene.root();
        let first = scene.reconcile_children(root, "tick", &["0", "5", "10"], NodeKind::Group);
        let second = scene.reconcile_children(root, "tick", &["5", "10", "15"], NodeKind::Group);
        assert_eq!(second[0], first[1]);
        assert_eq!(second[1], first[2]);
        assert!(!first.contains(&second[2]));
        assert_eq!(scene.count_class("tick"), 3);
        assert!(scene.node(first[0]).is_none());
    }

    #[test]
    fn removing_a_group_drops_its_subtree() {
        let mut scene = Scene::new(Viewport::new(100, 100));
        let group = scene.ensure_group(scene.root(), "legend");
        scene.append(group, "legend-entry", NodeKind::Group);
        assert_eq!(scene.len(), 3);
        scene.remove_child(scene.root(), "legend");
        assert_eq!(scene.len(), 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn hit_test_finds_topmost_interactive_rect() {
        let mut scene = Scene::new(Viewport::new(100, 100));
        let root = scene.root();
        let below = scene.append(root, "label-overlay", NodeKind::rect(0.0, 0.0, 50.0, 50.0));
        let above = scene.append(root, "label-overlay", NodeKind::rect(10.0, 10.0, 20.0, 20.0));
        for id in [below, above] {
            if let Some(node) = scene.node_mut(id) {
                node.datum = NodeDatum::Label(LabelTarget::Title);
            }
        }
        assert_eq!(scene.hit_test(15.0, 15.0), Some(above));
        assert_eq!(scene.hit_test(5.0, 5.0), Some(below));
        assert_eq!(scene.hit_test(80.0, 80.0), None);
    }
}
