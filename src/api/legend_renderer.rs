use crate::core::Plot;
use crate::render::{NodeKind, NodeStyle, PathData, Scene, TextAnchor, TextBaseline, TextMeasurer};

use super::ChartConfig;
use super::layer_renderer::upsert_child;
use super::legend_layout::{LegendItem, LegendLayoutParams, layout_legend};

pub(super) const LEGEND_CLASS: &str = "legend";
const LEGEND_RIGHT_PADDING_PX: f64 = 5.0;

/// Layout parameters for the legend column right of the plot area.
pub(super) fn legend_params(plot: &Plot, config: &ChartConfig) -> LegendLayoutParams {
    let mut x = plot.grid.right + config.legend_offset_px;
    if plot.scales.y_right.is_some() {
        x += config.legend_right_axis_offset_px;
    }
    LegendLayoutParams {
        x,
        start_y: plot.grid.top + config.legend_entry_spacing_px / 2.0,
        entry_spacing: config.legend_entry_spacing_px,
        gap: config.legend_gap_px,
        max_width: f64::from(plot.viewport.width) - x - LEGEND_RIGHT_PADDING_PX,
        font_size: config.legend_font_size_px,
        glyph_size: config.legend_glyph_size_px,
    }
}

/// Draws the legend, or removes it when there is nothing to show.
///
/// Returns the number of entries drawn.
pub(super) fn render_legend(
    scene: &mut Scene,
    items: &[LegendItem],
    plot: &Plot,
    config: &ChartConfig,
    measurer: &dyn TextMeasurer,
) -> usize {
    let root = scene.root();
    if !plot.show_legend || items.is_empty() {
        scene.remove_child(root, LEGEND_CLASS);
        return 0;
    }

    let params = legend_params(plot, config);
    let layout = layout_legend(items, params, measurer);
    let line_height = measurer.line_height(params.font_size);
    let legend = scene.ensure_group(root, LEGEND_CLASS);
    let keys: Vec<&str> = layout.iter().map(|entry| entry.key.as_str()).collect();
    let ids = scene.reconcile_children(legend, "legend-entry", &keys, NodeKind::Group);

    let radius = params.glyph_extent() / 2.0;
    for ((id, entry), item) in ids.into_iter().zip(&layout).zip(items) {
        if let Some(node) = scene.node_mut(id) {
            node.translate = Some((entry.x, entry.y));
        }

        let (glyph, style) = if item.line {
            (
                PathData::segment(0.0, 0.0, radius * 2.0, 0.0),
                NodeStyle::stroked(item.color, 2.0),
            )
        } else {
            (
                item.shape.path(params.glyph_size).translated(radius, 0.0),
                NodeStyle::filled(item.color),
            )
        };
        upsert_child(scene, id, "legend-glyph", NodeKind::Path { d: glyph }, style);

        let line_keys: Vec<String> = (0..entry.lines.len()).map(|i| i.to_string()).collect();
        let line_ids = scene.reconcile_children(id, "legend-label", &line_keys, NodeKind::Group);
        for (index, (line_id, text)) in line_ids.into_iter().zip(&entry.lines).enumerate() {
            if let Some(node) = scene.node_mut(line_id) {
                node.kind = NodeKind::Text {
                    x: params.label_offset(),
                    y: index as f64 * line_height,
                    content: text.clone(),
                    anchor: TextAnchor::Start,
                    baseline: TextBaseline::Middle,
                    rotate: 0.0,
                    font_size: params.font_size,
                };
                node.style = NodeStyle::filled(config.text_color);
            }
        }
    }
    layout.len()
}
