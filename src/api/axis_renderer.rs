use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{BoundingBox, PlotGrid, Scale, Tick};
use crate::render::{
    Color, NodeId, NodeKind, NodeStyle, PathData, Scene, TextAnchor, TextBaseline, TextMeasurer,
};

use super::ChartConfig;

/// Gridlines closer than this to a border are treated as coincident.
const BORDER_EPSILON_PX: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisOrientation {
    Bottom,
    Left,
    Right,
}

impl AxisOrientation {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Bottom => "axis axis-bottom",
            Self::Left => "axis axis-left",
            Self::Right => "axis axis-right",
        }
    }
}

/// Everything needed to draw one axis, fixed before the draw starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    pub orientation: AxisOrientation,
    pub tick_count: usize,
    pub tick_size: f64,
    pub padding: f64,
    pub font_size: f64,
    pub rotation_deg: f64,
    pub axis_color: Color,
    pub grid_color: Color,
    pub text_color: Color,
}

impl AxisSpec {
    #[must_use]
    pub fn from_config(orientation: AxisOrientation, config: &ChartConfig) -> Self {
        Self {
            orientation,
            tick_count: match orientation {
                AxisOrientation::Bottom => config.x_tick_count,
                AxisOrientation::Left | AxisOrientation::Right => config.y_tick_count,
            },
            tick_size: config.tick_size_px,
            padding: config.tick_padding_px,
            font_size: config.tick_font_size_px,
            rotation_deg: config.label_rotation_deg,
            axis_color: config.axis_color,
            grid_color: config.grid_color,
            text_color: config.text_color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisLayout {
    pub tick_count: usize,
    pub labels_rotated: bool,
}

/// `true` when any two neighbouring boxes, ordered left to right, touch.
#[must_use]
pub fn labels_collide(boxes: &[BoundingBox]) -> bool {
    let mut sorted: Vec<BoundingBox> = boxes.to_vec();
    sorted.sort_by_key(|bbox| OrderedFloat(bbox.x));
    sorted.windows(2).any(|pair| pair[0].right() >= pair[1].x)
}

/// Draws gridlines, ticks, labels and the border of one axis under `parent`,
/// reconciling every element against the previous render by tick key.
pub fn render_axis(
    scene: &mut Scene,
    parent: NodeId,
    scale: &Scale,
    spec: &AxisSpec,
    grid: PlotGrid,
    measurer: &dyn TextMeasurer,
) -> AxisLayout {
    let ticks = scale.ticks(spec.tick_count);
    let group = scene.ensure_group(parent, spec.orientation.class());

    let gridline_ticks: Vec<&Tick> = ticks
        .iter()
        .filter(|tick| !gridline_hits_border(spec.orientation, tick.position, grid))
        .collect();
    let gridline_keys: Vec<&str> = gridline_ticks.iter().map(|tick| tick.key.as_str()).collect();
    let gridline_ids = scene.reconcile_children(group, "gridline", &gridline_keys, NodeKind::Group);
    for (id, tick) in gridline_ids.into_iter().zip(gridline_ticks) {
        if let Some(node) = scene.node_mut(id) {
            node.kind = NodeKind::Path {
                d: gridline_path(spec.orientation, tick.position, grid),
            };
            node.style = NodeStyle::stroked(spec.grid_color, 1.0);
        }
    }

    let tick_keys: Vec<&str> = ticks.iter().map(|tick| tick.key.as_str()).collect();
    let tick_ids = scene.reconcile_children(group, "tick", &tick_keys, NodeKind::Group);
    for (id, tick) in tick_ids.into_iter().zip(&ticks) {
        if let Some(node) = scene.node_mut(id) {
            node.kind = NodeKind::Path {
                d: tick_path(spec, tick.position, grid),
            };
            node.style = NodeStyle::stroked(spec.axis_color, 1.0);
        }
    }

    let labels_rotated = spec.orientation == AxisOrientation::Bottom
        && labels_collide(&bottom_label_boxes(&ticks, spec, grid, measurer));
    let label_ids = scene.reconcile_children(group, "tick-label", &tick_keys, NodeKind::Group);
    for (id, tick) in label_ids.into_iter().zip(&ticks) {
        if let Some(node) = scene.node_mut(id) {
            node.kind = label_kind(spec, tick, grid, labels_rotated);
            node.style = NodeStyle::filled(spec.text_color);
        }
    }

    let border = scene.ensure_group(group, "axis-border");
    if let Some(node) = scene.node_mut(border) {
        node.kind = NodeKind::Path {
            d: border_path(spec.orientation, grid),
        };
        node.style = NodeStyle::stroked(spec.axis_color, 1.0);
    }

    AxisLayout {
        tick_count: ticks.len(),
        labels_rotated,
    }
}

fn gridline_hits_border(orientation: AxisOrientation, position: f64, grid: PlotGrid) -> bool {
    match orientation {
        AxisOrientation::Bottom => {
            (position - grid.left).abs() < BORDER_EPSILON_PX
                || (position - grid.right).abs() < BORDER_EPSILON_PX
        }
        AxisOrientation::Left | AxisOrientation::Right => {
            (position - grid.bottom).abs() < BORDER_EPSILON_PX
        }
    }
}

fn gridline_path(orientation: AxisOrientation, position: f64, grid: PlotGrid) -> PathData {
    match orientation {
        AxisOrientation::Bottom => PathData::segment(position, grid.top, position, grid.bottom),
        AxisOrientation::Left | AxisOrientation::Right => {
            PathData::segment(grid.left, position, grid.right, position)
        }
    }
}

fn tick_path(spec: &AxisSpec, position: f64, grid: PlotGrid) -> PathData {
    match spec.orientation {
        AxisOrientation::Bottom => PathData::segment(
            position,
            grid.bottom,
            position,
            grid.bottom + spec.tick_size,
        ),
        AxisOrientation::Left => {
            PathData::segment(grid.left - spec.tick_size, position, grid.left, position)
        }
        AxisOrientation::Right => {
            PathData::segment(grid.right, position, grid.right + spec.tick_size, position)
        }
    }
}

fn border_path(orientation: AxisOrientation, grid: PlotGrid) -> PathData {
    match orientation {
        AxisOrientation::Bottom => PathData::segment(grid.left, grid.bottom, grid.right, grid.bottom),
        AxisOrientation::Left => PathData::segment(grid.left, grid.top, grid.left, grid.bottom),
        AxisOrientation::Right => PathData::segment(grid.right, grid.top, grid.right, grid.bottom),
    }
}

fn bottom_label_boxes(
    ticks: &[Tick],
    spec: &AxisSpec,
    grid: PlotGrid,
    measurer: &dyn TextMeasurer,
) -> Vec<BoundingBox> {
    let y = grid.bottom + spec.tick_size + spec.padding;
    ticks
        .iter()
        .map(|tick| {
            let width = measurer.text_width(&tick.label, spec.font_size);
            BoundingBox::new(
                tick.position - width / 2.0,
                y,
                width,
                measurer.line_height(spec.font_size),
            )
        })
        .collect()
}

fn label_kind(spec: &AxisSpec, tick: &Tick, grid: PlotGrid, rotated: bool) -> NodeKind {
    let offset = spec.tick_size + spec.padding;
    let (x, y, anchor, baseline, rotate) = match spec.orientation {
        AxisOrientation::Bottom if rotated => (
            tick.position,
            grid.bottom + offset,
            TextAnchor::Start,
            TextBaseline::Hanging,
            spec.rotation_deg,
        ),
        AxisOrientation::Bottom => (
            tick.position,
            grid.bottom + offset,
            TextAnchor::Middle,
            TextBaseline::Hanging,
            0.0,
        ),
        AxisOrientation::Left => (
            grid.left - offset,
            tick.position,
            TextAnchor::End,
            TextBaseline::Middle,
            0.0,
        ),
        AxisOrientation::Right => (
            grid.right + offset,
            tick.position,
            TextAnchor::Start,
            TextBaseline::Middle,
            0.0,
        ),
    };
    NodeKind::Text {
        x,
        y,
        content: tick.label.clone(),
        anchor,
        baseline,
        rotate,
        font_size: spec.font_size,
    }
}

#[cfg(test)]
mod tests {
    use super::labels_collide;
    use crate::core::BoundingBox;

    #[test]
    fn touching_boxes_count_as_collision() {
        let boxes = [
            BoundingBox::new(0.0, 0.0, 10.0, 5.0),
            BoundingBox::new(10.0, 0.0, 10.0, 5.0),
        ];
        assert!(labels_collide(&boxes));
    }

    #[test]
    fn separated_boxes_do_not_collide() {
        let boxes = [
            BoundingBox::new(30.0, 0.0, 10.0, 5.0),
            BoundingBox::new(0.0, 0.0, 10.0, 5.0),
            BoundingBox::new(15.0, 0.0, 10.0, 5.0),
        ];
        assert!(!labels_collide(&boxes));
    }
}
