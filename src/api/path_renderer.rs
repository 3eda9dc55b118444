use indexmap::IndexMap;

use crate::core::Geom;
use crate::render::{Color, NodeDatum, NodeId, NodeKind, NodeStyle, PathData, Scene};

use super::layer_renderer::GeomContext;

/// Key of the single polyline drawn when `aes.group` is unmapped.
const UNGROUPED_KEY: &str = "all";

struct PathGroup {
    color: Color,
    first_row: usize,
    points: Vec<(f64, f64)>,
}

/// Connects drawable rows in data order, one polyline per group key.
pub(super) fn render_paths(scene: &mut Scene, group: NodeId, ctx: &GeomContext<'_>) {
    let aes = &ctx.layer.aes;
    let mut groups: IndexMap<String, PathGroup> = IndexMap::new();
    for (index, row) in ctx.layer.data.iter().enumerate() {
        let key = if aes.group.is_some() {
            aes.group_key(row).unwrap_or_default()
        } else {
            UNGROUPED_KEY.to_owned()
        };
        let entry = groups.entry(key).or_insert_with(|| PathGroup {
            color: ctx.paint.color(ctx.layer, row),
            first_row: index,
            points: Vec::new(),
        });
        if let Some(point) = ctx.project(row) {
            entry.points.push(point);
        }
    }
    groups.retain(|_, path| !path.points.is_empty());

    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    let ids = scene.reconcile_children(group, Geom::Path.class(), &keys, NodeKind::Group);
    for (id, path) in ids.into_iter().zip(groups.values()) {
        if let Some(node) = scene.node_mut(id) {
            node.kind = NodeKind::Path {
                d: PathData::polyline(path.points.iter().copied()),
            };
            node.style = NodeStyle::stroked(path.color, ctx.layer.style.line_width);
            node.datum = NodeDatum::Row {
                layer: ctx.layer_index,
                row: path.first_row,
            };
        }
    }
}
