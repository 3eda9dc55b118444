use crate::core::PlotGrid;
use crate::render::{NodeId, NodeKind, Scene};

pub(super) const CLIP_CLASS: &str = "clip-region";

/// Recomputes the layer clip rect, or removes it when clipping is off.
///
/// Returns the id layer groups should reference.
pub(super) fn update_clip_region(
    scene: &mut Scene,
    grid: PlotGrid,
    margin_px: f64,
    enabled: bool,
) -> Option<NodeId> {
    let root = scene.root();
    if !enabled {
        scene.remove_child(root, CLIP_CLASS);
        return None;
    }
    let area = grid.expanded(margin_px);
    let id = scene.ensure_group(root, CLIP_CLASS);
    if let Some(node) = scene.node_mut(id) {
        node.kind = NodeKind::ClipRect {
            x: area.left,
            y: area.top,
            width: area.width,
            height: area.height,
        };
    }
    Some(id)
}
