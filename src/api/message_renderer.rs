use crate::core::{PlotGrid, Viewport};
use crate::error::ChartError;
use crate::render::{NodeKind, NodeStyle, Scene, TextAnchor, TextBaseline};

use super::ChartConfig;

pub(super) const ERROR_CLASS: &str = "chart-error";
pub(super) const WARNING_CLASS: &str = "chart-warning";

/// Replaces the whole chart with a centred error message.
pub(super) fn render_error_message(
    scene: &mut Scene,
    viewport: Viewport,
    error: &ChartError,
    config: &ChartConfig,
) {
    scene.clear();
    let root = scene.root();
    let id = scene.append(
        root,
        ERROR_CLASS,
        NodeKind::Text {
            x: f64::from(viewport.width) / 2.0,
            y: f64::from(viewport.height) / 2.0,
            content: format!("Cannot render chart: {error}"),
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Middle,
            rotate: 0.0,
            font_size: config.label_font_size_px,
        },
    );
    if let Some(node) = scene.node_mut(id) {
        node.style = NodeStyle::filled(config.error_color);
    }
}

/// Draws the empty-layer banner above the plot, or removes it.
pub(super) fn update_warning_banner(
    scene: &mut Scene,
    grid: PlotGrid,
    empty_layers: &[String],
    config: &ChartConfig,
) {
    let root = scene.root();
    if empty_layers.is_empty() {
        scene.remove_child(root, WARNING_CLASS);
        return;
    }
    let id = scene.ensure_group(root, WARNING_CLASS);
    if let Some(node) = scene.node_mut(id) {
        node.kind = NodeKind::Text {
            x: grid.right,
            y: grid.top - config.tick_padding_px,
            content: format!("No data to display for: {}", empty_layers.join(", ")),
            anchor: TextAnchor::End,
            baseline: TextBaseline::Alphabetic,
            rotate: 0.0,
            font_size: config.tick_font_size_px,
        };
        node.style = NodeStyle::filled(config.warning_color);
    }
}
