use crate::core::Geom;
use crate::render::{Color, NodeDatum, NodeId, NodeKind, NodeStyle, PathData, Scene};

use super::layer_renderer::{GeomContext, upsert_child};

/// Pixel geometry of one error bar.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ErrorBarGeometry {
    x: f64,
    top: f64,
    bottom: f64,
}

/// Draws a capped vertical bar spanning `value ± error` per drawable row.
pub(super) fn render_error_bars(scene: &mut Scene, group: NodeId, ctx: &GeomContext<'_>) {
    let aes = &ctx.layer.aes;
    let mut bars: Vec<(usize, ErrorBarGeometry, Color)> = Vec::new();
    for (index, row) in ctx.layer.data.iter().enumerate() {
        // Filtered rows still go through the color accessor.
        let color = ctx.paint.color(ctx.layer, row);
        let Some((x, _)) = ctx.project(row) else {
            continue;
        };
        let Some(value) = aes.y_value(row).as_number() else {
            continue;
        };
        let Some(error) = aes
            .y_error
            .as_ref()
            .and_then(|channel| channel.eval(row).as_number())
        else {
            continue;
        };
        let error = error.abs();
        let top = ctx.y.map_number(value + error);
        let bottom = ctx.y.map_number(value - error);
        let (Some(top), Some(bottom)) = (top, bottom) else {
            continue;
        };
        bars.push((index, ErrorBarGeometry { x, top, bottom }, color));
    }

    let keys: Vec<String> = bars.iter().map(|(index, _, _)| index.to_string()).collect();
    let ids = scene.reconcile_children(group, Geom::ErrorBar.class(), &keys, NodeKind::Group);
    let half_cap = ctx.layer.options.cap_width_px / 2.0;
    let width = ctx.layer.style.line_width;
    for (id, (index, bar, color)) in ids.into_iter().zip(bars) {
        if let Some(node) = scene.node_mut(id) {
            node.datum = NodeDatum::Row {
                layer: ctx.layer_index,
                row: index,
            };
        }
        let style = NodeStyle::stroked(color, width);
        upsert_child(
            scene,
            id,
            "errorbar-cap errorbar-cap-top",
            NodeKind::Path {
                d: PathData::segment(bar.x - half_cap, bar.top, bar.x + half_cap, bar.top),
            },
            style,
        );
        upsert_child(
            scene,
            id,
            "errorbar-stem",
            NodeKind::Path {
                d: PathData::segment(bar.x, bar.top, bar.x, bar.bottom),
            },
            style,
        );
        upsert_child(
            scene,
            id,
            "errorbar-cap errorbar-cap-bottom",
            NodeKind::Path {
                d: PathData::segment(bar.x - half_cap, bar.bottom, bar.x + half_cap, bar.bottom),
            },
            style,
        );
    }
}
