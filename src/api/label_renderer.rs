use crate::core::{BoundingBox, LabelTarget, Plot, PlotGrid};
use crate::render::{
    Color, NodeDatum, NodeId, NodeKind, NodeStyle, PathData, Scene, TextAnchor, TextBaseline,
    TextMeasurer,
};

use super::ChartConfig;

pub(super) const LABELS_CLASS: &str = "labels";
pub(super) const OVERLAYS_CLASS: &str = "label-overlays";
const INDICATOR_SIZE_PX: f64 = 6.0;
const INDICATOR_GAP_PX: f64 = 4.0;

/// Placement of one chart label.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LabelPlacement {
    x: f64,
    y: f64,
    anchor: TextAnchor,
    baseline: TextBaseline,
    rotate: f64,
    font_size: f64,
}

impl LabelPlacement {
    fn for_target(target: LabelTarget, grid: PlotGrid, config: &ChartConfig) -> Self {
        let center_x = (grid.left + grid.right) / 2.0;
        let center_y = (grid.top + grid.bottom) / 2.0;
        match target {
            LabelTarget::Title => Self {
                x: center_x,
                y: grid.top / 2.0,
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Middle,
                rotate: 0.0,
                font_size: config.title_font_size_px,
            },
            LabelTarget::X => Self {
                x: center_x,
                y: grid.bottom + config.axis_label_offset_px,
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Hanging,
                rotate: 0.0,
                font_size: config.label_font_size_px,
            },
            LabelTarget::YLeft => Self {
                x: grid.left - config.axis_label_offset_px,
                y: center_y,
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Middle,
                rotate: -90.0,
                font_size: config.label_font_size_px,
            },
            LabelTarget::YRight => Self {
                x: grid.right + config.axis_label_offset_px,
                y: center_y,
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Middle,
                rotate: 90.0,
                font_size: config.label_font_size_px,
            },
        }
    }

    /// Screen box of the drawn text; vertical labels swap width and height.
    fn bounds(self, text: &str, measurer: &dyn TextMeasurer) -> BoundingBox {
        let width = measurer.text_width(text, self.font_size);
        let height = measurer.line_height(self.font_size);
        if self.rotate != 0.0 {
            return BoundingBox::new(self.x - height / 2.0, self.y - width / 2.0, height, width);
        }
        let top = match self.baseline {
            TextBaseline::Hanging => self.y,
            TextBaseline::Middle => self.y - height / 2.0,
            TextBaseline::Alphabetic => self.y - height,
        };
        BoundingBox::new(self.x - width / 2.0, top, width, height)
    }
}

/// Draws title and axis labels, then recreates their click overlays.
pub(super) fn render_labels(
    scene: &mut Scene,
    plot: &Plot,
    config: &ChartConfig,
    measurer: &dyn TextMeasurer,
) {
    let root = scene.root();
    let labels = scene.ensure_group(root, LABELS_CLASS);
    let overlays = scene.ensure_group(root, OVERLAYS_CLASS);
    scene.clear_children(overlays);

    for target in LabelTarget::ALL {
        // The right label follows the right axis.
        let has_axis = target != LabelTarget::YRight || plot.scales.y_right.is_some();
        let label = plot.labels.get(target).filter(|_| has_axis);
        let Some(label) = label else {
            scene.remove_child(labels, target.class());
            continue;
        };

        let placement = LabelPlacement::for_target(target, plot.grid, config);
        let id = scene.ensure_group(labels, target.class());
        if let Some(node) = scene.node_mut(id) {
            node.kind = NodeKind::Text {
                x: placement.x,
                y: placement.y,
                content: label.text.clone(),
                anchor: placement.anchor,
                baseline: placement.baseline,
                rotate: placement.rotate,
                font_size: placement.font_size,
            };
            node.style = NodeStyle::filled(config.text_color);
        }

        if label.clickable {
            let bounds = placement.bounds(&label.text, measurer);
            draw_overlay(scene, overlays, target, bounds, config.text_color);
        }
    }
}

fn draw_overlay(
    scene: &mut Scene,
    overlays: NodeId,
    target: LabelTarget,
    bounds: BoundingBox,
    color: Color,
) {
    let overlay = scene.append(
        overlays,
        "label-overlay",
        NodeKind::rect(bounds.x, bounds.y, bounds.width, bounds.height),
    );
    if let Some(node) = scene.node_mut(overlay) {
        node.style = NodeStyle::filled(Color::TRANSPARENT);
        node.datum = NodeDatum::Label(target);
    }

    let indicator = scene.append(
        overlays,
        "label-indicator",
        NodeKind::Path {
            d: indicator_path(target, bounds),
        },
    );
    if let Some(node) = scene.node_mut(indicator) {
        node.style = NodeStyle::filled(color);
    }
}

/// Small downward triangle right of horizontal labels, below vertical ones.
fn indicator_path(target: LabelTarget, bounds: BoundingBox) -> PathData {
    let half = INDICATOR_SIZE_PX / 2.0;
    let (cx, cy) = match target {
        LabelTarget::Title | LabelTarget::X => (
            bounds.right() + INDICATOR_GAP_PX + half,
            bounds.y + bounds.height / 2.0,
        ),
        LabelTarget::YLeft | LabelTarget::YRight => (
            bounds.x + bounds.width / 2.0,
            bounds.bottom() + INDICATOR_GAP_PX + half,
        ),
    };
    let mut path = PathData::polyline([
        (cx - half, cy - half / 2.0),
        (cx + half, cy - half / 2.0),
        (cx, cy + half / 2.0),
    ]);
    path.close();
    path
}
