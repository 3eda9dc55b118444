use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::core::{Plot, PlotGrid, Scale, ScaleMapping};
use crate::interaction::{
    BrushBounds, BrushModel, BrushPhase, BrushState, BrushTarget, BrushTransition, PixelSpan,
    PointerEvent,
};
use crate::render::{Color, NodeDatum, NodeId, NodeKind, NodeStyle, Scene};

use super::layer_renderer::upsert_child;
use super::{AxisExtent, BrushEvent, BrushEventKind, BrushExtent, ChartConfig, LayerSelection};

/// Padded clones of the data scales the brush measures against.
#[derive(Debug, Clone)]
struct BrushScales {
    x: Scale,
    y: Scale,
}

/// Pixel strips hosting the edge handle brushes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HandleStrips {
    x: Option<(f64, f64)>,
    y: Option<(f64, f64)>,
}

/// Owns brush state across renders and maps it to data space.
#[derive(Debug, Default)]
pub(super) struct BrushController {
    model: Option<BrushModel>,
    scales: Option<BrushScales>,
    strips: Option<HandleStrips>,
}

impl BrushController {
    /// Re-reads the brush setup of `plot`.
    ///
    /// An idle selection is remapped through the new scales so its data
    /// extent survives; a gesture in progress keeps its pixel state.
    pub fn configure(&mut self, plot: &Plot, config: &ChartConfig) {
        let (Some(brush), Some(x), Some(y)) = (
            plot.brush,
            plot.scales.x.as_ref(),
            plot.scales.primary_y(),
        ) else {
            self.model = None;
            self.scales = None;
            self.strips = None;
            return;
        };

        let padding = config.brush_padding_px;
        let scales = BrushScales {
            x: x.padded(padding),
            y: y.padded(padding),
        };
        let bounds = BrushBounds {
            x: PixelSpan::new(plot.grid.left - padding, plot.grid.right + padding),
            y: PixelSpan::new(plot.grid.top - padding, plot.grid.bottom + padding),
        };

        match self.model.as_mut() {
            Some(model) => {
                let remapped = match (&self.scales, model.is_active()) {
                    (Some(previous), false) => Some((
                        model
                            .x_selection()
                            .and_then(|span| remap_span(span, &previous.x, &scales.x)),
                        model
                            .y_selection()
                            .and_then(|span| remap_span(span, &previous.y, &scales.y)),
                    )),
                    _ => None,
                };
                model.reconfigure(brush.x, brush.y, bounds);
                if let Some((x, y)) = remapped {
                    model.set_selections(x, y);
                }
            }
            None => self.model = Some(BrushModel::new(brush.x, brush.y, bounds)),
        }

        self.strips = brush.handles.then(|| {
            handle_strips(plot.grid, bounds, brush.x, brush.y, config)
        });
        self.scales = Some(scales);
    }

    #[must_use]
    pub fn state(&self) -> BrushState {
        self.model.as_ref().map_or(BrushState::None, BrushModel::state)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.model.as_ref().is_some_and(BrushModel::is_active)
    }

    pub fn begin(&mut self, target: BrushTarget, x: f64, y: f64) -> Option<BrushTransition> {
        self.model.as_mut()?.begin(target, x, y)
    }

    pub fn update(&mut self, x: f64, y: f64) -> Option<BrushTransition> {
        self.model.as_mut()?.update(x, y)
    }

    pub fn end(&mut self, x: f64, y: f64) -> Option<BrushTransition> {
        self.model.as_mut()?.end(x, y)
    }

    pub fn clear(&mut self) -> Option<BrushTransition> {
        self.model.as_mut()?.clear()
    }

    /// Drops the model entirely; the next render starts from `None`.
    pub fn reset(&mut self) {
        self.model = None;
        self.scales = None;
        self.strips = None;
    }

    /// Data extent of the current selection; `None` in state `None`.
    #[must_use]
    pub fn extent(&self) -> Option<BrushExtent> {
        let model = self.model.as_ref()?;
        let scales = self.scales.as_ref()?;
        if model.state() == BrushState::None {
            return None;
        }
        Some(BrushExtent {
            x: model
                .x_selection()
                .and_then(|span| axis_extent(span, &scales.x)),
            y: model
                .y_selection()
                .and_then(|span| axis_extent(span, &scales.y)),
        })
    }

    /// Rows of every layer whose unjittered position lies in the selection.
    #[must_use]
    pub fn selections(&self, plot: &Plot) -> Vec<LayerSelection> {
        let Some(model) = self.model.as_ref() else {
            return Vec::new();
        };
        if model.state() == BrushState::None {
            return Vec::new();
        }
        let Some(x_scale) = plot.scales.x.as_ref() else {
            return Vec::new();
        };
        let (x_span, y_span) = (model.x_selection(), model.y_selection());

        plot.layers
            .iter()
            .enumerate()
            .map(|(layer_index, layer)| {
                let y_scale = plot.scales.y_for(layer.y_axis);
                let rows = layer
                    .data
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| {
                        let Some(x) = x_scale.map(&layer.aes.x_value(row)) else {
                            return false;
                        };
                        let Some(y) = y_scale.and_then(|scale| scale.map(&layer.aes.y_value(row)))
                        else {
                            return false;
                        };
                        x_span.is_none_or(|span| span.contains(x))
                            && y_span.is_none_or(|span| span.contains(y))
                    })
                    .map(|(index, _)| index)
                    .collect();
                LayerSelection {
                    layer_index,
                    layer_name: layer.name.clone(),
                    rows,
                }
            })
            .collect()
    }

    /// Builds the listener payload for `transition`.
    #[must_use]
    pub fn event(
        &self,
        transition: BrushTransition,
        pointer: Option<PointerEvent>,
        plot: Option<&Plot>,
    ) -> BrushEvent {
        let kind = match transition.phase {
            BrushPhase::Start => BrushEventKind::Start,
            BrushPhase::Brush => BrushEventKind::Brush,
            BrushPhase::End => BrushEventKind::End,
            BrushPhase::Clear => BrushEventKind::Clear,
        };
        BrushEvent {
            kind,
            pointer,
            state: transition.state,
            extent: self.extent(),
            layer_data: plot.map_or_else(Vec::new, |plot| {
                plot.layers.iter().map(|layer| Arc::clone(&layer.data)).collect()
            }),
            selections: plot.map_or_else(Vec::new, |plot| self.selections(plot)),
        }
    }

    /// Centre of the surface `target`, used to script gestures.
    #[must_use]
    pub fn surface_center(&self, target: BrushTarget) -> Option<(f64, f64)> {
        let bounds = self.model.as_ref()?.bounds();
        let mid = |span: PixelSpan| (span.start + span.end) / 2.0;
        match target {
            BrushTarget::Main => Some((mid(bounds.x), mid(bounds.y))),
            BrushTarget::XHandle => {
                let (top, bottom) = self.strips?.x?;
                Some((mid(bounds.x), (top + bottom) / 2.0))
            }
            BrushTarget::YHandle => {
                let (left, right) = self.strips?.y?;
                Some(((left + right) / 2.0, mid(bounds.y)))
            }
        }
    }

    /// Redraws the main brush and the handle strips under the root.
    pub fn draw(&self, scene: &mut Scene, config: &ChartConfig) {
        let root = scene.root();
        let Some(model) = self.model.as_ref() else {
            for target in [BrushTarget::Main, BrushTarget::XHandle, BrushTarget::YHandle] {
                scene.remove_child(root, target.class());
            }
            return;
        };
        let bounds = model.bounds();

        let main = scene.ensure_group(root, BrushTarget::Main.class());
        draw_surface(
            scene,
            main,
            BrushTarget::Main,
            (bounds.x.start, bounds.y.start, bounds.x.len(), bounds.y.len()),
            model
                .main_extent()
                .map(|(x, y)| (x.start, y.start, x.len(), y.len())),
            config.brush_color,
        );

        let strips = self.strips.unwrap_or(HandleStrips { x: None, y: None });
        match strips.x {
            Some((top, bottom)) => {
                let group = scene.ensure_group(root, BrushTarget::XHandle.class());
                draw_surface(
                    scene,
                    group,
                    BrushTarget::XHandle,
                    (bounds.x.start, top, bounds.x.len(), bottom - top),
                    model
                        .x_selection()
                        .map(|span| (span.start, top, span.len(), bottom - top)),
                    config.brush_color,
                );
            }
            None => scene.remove_child(root, BrushTarget::XHandle.class()),
        }
        match strips.y {
            Some((left, right)) => {
                let group = scene.ensure_group(root, BrushTarget::YHandle.class());
                draw_surface(
                    scene,
                    group,
                    BrushTarget::YHandle,
                    (left, bounds.y.start, right - left, bounds.y.len()),
                    model
                        .y_selection()
                        .map(|span| (left, span.start, right - left, span.len())),
                    config.brush_color,
                );
            }
            None => scene.remove_child(root, BrushTarget::YHandle.class()),
        }
    }
}

fn handle_strips(
    grid: PlotGrid,
    bounds: BrushBounds,
    enable_x: bool,
    enable_y: bool,
    config: &ChartConfig,
) -> HandleStrips {
    let thickness = config.brush_handle_thickness_px;
    let offset = config.brush_handle_offset_px;
    let x_top = bounds.y.end.max(grid.bottom) + offset;
    let y_right = bounds.x.start.min(grid.left) - offset;
    HandleStrips {
        x: enable_x.then_some((x_top, x_top + thickness)),
        y: enable_y.then_some((y_right - thickness, y_right)),
    }
}

type RectGeometry = (f64, f64, f64, f64);

/// Transparent hit surface plus the visible selection rect.
fn draw_surface(
    scene: &mut Scene,
    group: NodeId,
    target: BrushTarget,
    overlay: RectGeometry,
    selection: Option<RectGeometry>,
    color: Color,
) {
    let (x, y, width, height) = overlay;
    let overlay_id = upsert_child(
        scene,
        group,
        "brush-overlay",
        NodeKind::rect(x, y, width, height),
        NodeStyle::filled(Color::TRANSPARENT),
    );
    if let Some(node) = scene.node_mut(overlay_id) {
        node.datum = NodeDatum::Brush(target);
    }
    match selection {
        Some((x, y, width, height)) => {
            upsert_child(
                scene,
                group,
                "brush-selection",
                NodeKind::rect(x, y, width, height),
                NodeStyle::filled(color).with_stroke(color.with_alpha(1.0), 1.0),
            );
        }
        None => scene.remove_child(group, "brush-selection"),
    }
}

/// Data extent of a pixel span on one brush scale.
fn axis_extent(span: PixelSpan, scale: &Scale) -> Option<AxisExtent> {
    match scale.mapping() {
        ScaleMapping::Continuous(continuous) => {
            let a = continuous.invert(span.start)?;
            let b = continuous.invert(span.end)?;
            Some(AxisExtent::Continuous(a.min(b), a.max(b)))
        }
        ScaleMapping::Discrete(discrete) => Some(AxisExtent::Categories(
            discrete
                .domain()
                .iter()
                .filter(|key| discrete.map_key(key).is_some_and(|px| span.contains(px)))
                .cloned()
                .collect(),
        )),
    }
}

/// Carries a selection from `previous` to `next` through data space.
fn remap_span(span: PixelSpan, previous: &Scale, next: &Scale) -> Option<PixelSpan> {
    match axis_extent(span, previous)? {
        AxisExtent::Continuous(low, high) => {
            let a = next.map_number(low)?;
            let b = next.map_number(high)?;
            Some(PixelSpan::new(a, b))
        }
        AxisExtent::Categories(keys) => {
            let discrete = next.as_discrete()?;
            let half = discrete.band_width() / 2.0;
            let centers: Vec<OrderedFloat<f64>> = keys
                .iter()
                .filter_map(|key| discrete.map_key(key))
                .map(OrderedFloat)
                .collect();
            let low = centers.iter().min()?.0;
            let high = centers.iter().max()?.0;
            Some(PixelSpan::new(low - half, high + half))
        }
    }
}
