use indexmap::IndexSet;
use rand::rngs::StdRng;

use crate::core::{ColorScale, Geom, Layer, Plot, Row, Scale, ShapeScale};
use crate::render::{Color, NodeDatum, NodeId, NodeKind, NodeStyle, Scene, ShapeKind};

use super::box_plot_renderer::render_box_plot;
use super::error_bar_renderer::render_error_bars;
use super::legend_layout::LegendItem;
use super::path_renderer::render_paths;
use super::point_renderer::render_points;

pub(super) const LAYERS_CLASS: &str = "layers";
pub(super) const LAYER_CLASS: &str = "layer";
pub(super) const OUTLIER_CLASS: &str = "geom-boxplot-outlier";

/// Everything a geom renderer reads for one layer.
pub(super) struct GeomContext<'a> {
    pub layer_index: usize,
    pub layer: &'a Layer,
    pub x: &'a Scale,
    pub y: &'a Scale,
    pub paint: &'a LayerPaint,
}

impl GeomContext<'_> {
    /// Pixel position of `row`, or `None` when either channel has no value.
    pub fn project(&self, row: &Row) -> Option<(f64, f64)> {
        let x = self.x.map(&self.layer.aes.x_value(row))?;
        let y = self.y.map(&self.layer.aes.y_value(row))?;
        Some((x, y))
    }
}

/// Color and shape resolution for one layer.
///
/// Built by a discovery pass over every row, drawable or not, so filtered
/// rows still claim their palette slot and legend entry.
#[derive(Debug, Clone)]
pub(super) struct LayerPaint {
    color: Color,
    shape: ShapeKind,
    colors: Option<ColorScale>,
    shapes: Option<ShapeScale>,
    color_keys: IndexSet<String>,
    shape_keys: IndexSet<String>,
}

impl LayerPaint {
    pub fn discover(layer: &Layer, palette: &[Color], plot_shapes: Option<&ShapeScale>) -> Self {
        let mut colors = layer.aes.color.as_ref().map(|_| {
            layer
                .style
                .color_scale
                .clone()
                .unwrap_or_else(|| ColorScale::with_palette(Vec::<String>::new(), palette.to_vec()))
        });
        let mut shapes = layer.aes.shape.as_ref().map(|_| {
            layer
                .style
                .shape_scale
                .clone()
                .or_else(|| plot_shapes.cloned())
                .unwrap_or_default()
        });

        let mut color_keys = IndexSet::new();
        let mut shape_keys = IndexSet::new();
        for row in layer.data.iter() {
            if let (Some(scale), Some(key)) = (colors.as_mut(), layer.aes.color_key(row)) {
                scale.register(&key);
                color_keys.insert(key);
            }
            if let (Some(scale), Some(key)) = (shapes.as_mut(), layer.aes.shape_key(row)) {
                scale.register(&key);
                shape_keys.insert(key);
            }
        }

        Self {
            color: layer.style.color,
            shape: layer.style.shape,
            colors,
            shapes,
            color_keys,
            shape_keys,
        }
    }

    pub fn color(&self, layer: &Layer, row: &Row) -> Color {
        match (&self.colors, layer.aes.color_key(row)) {
            (Some(scale), Some(key)) => scale.color(&key),
            _ => self.color,
        }
    }

    pub fn shape(&self, layer: &Layer, row: &Row) -> ShapeKind {
        match (&self.shapes, layer.aes.shape_key(row)) {
            (Some(scale), Some(key)) => scale.shape(&key),
            _ => self.shape,
        }
    }

    /// Legend entries: one per color key, else per shape key, else one named
    /// after the layer.
    pub fn legend_items(&self, layer: &Layer) -> Vec<LegendItem> {
        let line = layer.geom == Geom::Path;
        if let Some(scale) = &self.colors {
            return self
                .color_keys
                .iter()
                .map(|key| LegendItem {
                    layer_name: layer.name.clone(),
                    key: key.clone(),
                    label: key.clone(),
                    color: scale.color(key),
                    shape: self.shape,
                    line,
                })
                .collect();
        }
        if let Some(scale) = &self.shapes {
            return self
                .shape_keys
                .iter()
                .map(|key| LegendItem {
                    layer_name: layer.name.clone(),
                    key: key.clone(),
                    label: key.clone(),
                    color: self.color,
                    shape: scale.shape(key),
                    line,
                })
                .collect();
        }
        if layer.name.trim().is_empty() {
            return Vec::new();
        }
        vec![LegendItem {
            layer_name: layer.name.clone(),
            key: layer.name.clone(),
            label: layer.name.clone(),
            color: self.color,
            shape: self.shape,
            line,
        }]
    }
}

/// One symbol mark, shared by point layers and box-plot outliers.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Glyph {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub row: usize,
    pub color: Color,
    pub shape: ShapeKind,
    pub size: f64,
    pub title: Option<String>,
}

/// Reconciles `class` glyph nodes under `parent` by glyph key.
pub(super) fn draw_glyphs(
    scene: &mut Scene,
    parent: NodeId,
    class: &str,
    glyphs: &[Glyph],
    ctx: &GeomContext<'_>,
) {
    let keys: Vec<&str> = glyphs.iter().map(|glyph| glyph.key.as_str()).collect();
    let ids = scene.reconcile_children(parent, class, &keys, NodeKind::Group);
    for (id, glyph) in ids.into_iter().zip(glyphs) {
        if let Some(node) = scene.node_mut(id) {
            node.kind = NodeKind::Path {
                d: glyph.shape.path(glyph.size),
            };
            node.translate = Some((glyph.x, glyph.y));
            node.style = NodeStyle::filled(glyph.color);
            node.title.clone_from(&glyph.title);
            node.datum = NodeDatum::Row {
                layer: ctx.layer_index,
                row: glyph.row,
            };
            node.handlers = ctx.layer.handlers.clone();
        }
    }
}

/// Updates the singleton `class` child of `parent` in place.
pub(super) fn upsert_child(
    scene: &mut Scene,
    parent: NodeId,
    class: &str,
    kind: NodeKind,
    style: NodeStyle,
) -> NodeId {
    let id = scene.ensure_group(parent, class);
    if let Some(node) = scene.node_mut(id) {
        node.kind = kind;
        node.style = style;
    }
    id
}

/// Reconciles one `layer` group per plot layer and draws its geometry.
///
/// Returns the legend items of every layer, in plot order.
pub(super) fn render_layers(
    scene: &mut Scene,
    plot: &Plot,
    palette: &[Color],
    clip: Option<NodeId>,
    rng: &mut StdRng,
) -> Vec<LegendItem> {
    let root = scene.root();
    let layers_group = scene.ensure_group(root, LAYERS_CLASS);
    let keys: Vec<String> = plot
        .layers
        .iter()
        .enumerate()
        .map(|(index, layer)| format!("{index}:{}", layer.name))
        .collect();
    let ids = scene.reconcile_children(layers_group, LAYER_CLASS, &keys, NodeKind::Group);

    let mut legend = Vec::new();
    for (layer_index, (group, layer)) in ids.into_iter().zip(&plot.layers).enumerate() {
        if let Some(node) = scene.node_mut(group) {
            node.clip = clip;
            node.style = NodeStyle::default().with_opacity(layer.style.opacity);
        }
        drop_foreign_geoms(scene, group, layer.geom);

        let paint = LayerPaint::discover(layer, palette, plot.scales.shape.as_ref());
        for item in paint.legend_items(layer) {
            let key = item.entry_key();
            if !legend.iter().any(|seen: &LegendItem| seen.entry_key() == key) {
                legend.push(item);
            }
        }

        let (Some(x), Some(y)) = (plot.scales.x.as_ref(), plot.scales.y_for(layer.y_axis)) else {
            continue;
        };
        let ctx = GeomContext {
            layer_index,
            layer,
            x,
            y,
            paint: &paint,
        };
        match layer.geom {
            Geom::Point => render_points(scene, group, &ctx, rng),
            Geom::Path => render_paths(scene, group, &ctx),
            Geom::ErrorBar => render_error_bars(scene, group, &ctx),
            Geom::BoxPlot => render_box_plot(scene, group, &ctx, rng),
        }
    }
    legend
}

/// Removes children left over from a different geom under the same key.
fn drop_foreign_geoms(scene: &mut Scene, group: NodeId, geom: Geom) {
    let stale: Vec<NodeId> = scene
        .children(group)
        .iter()
        .copied()
        .filter(|id| {
            scene.node(*id).is_some_and(|node| {
                node.class != geom.class()
                    && !(geom == Geom::BoxPlot && node.class == OUTLIER_CLASS)
            })
        })
        .collect();
    for id in stale {
        scene.remove(id);
    }
}
