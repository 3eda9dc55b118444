use indexmap::IndexMap;
use rand::rngs::StdRng;
use tracing::trace;

use crate::core::{Geom, QuartileSummary};
use crate::render::{Color, NodeDatum, NodeId, NodeKind, NodeStyle, PathData, Scene};

use super::layer_renderer::{GeomContext, Glyph, OUTLIER_CLASS, draw_glyphs, upsert_child};
use super::point_renderer::point_glyph;

const BOX_FILL_ALPHA: f64 = 0.25;
const MEDIAN_WIDTH_FACTOR: f64 = 2.0;

/// Samples of one discrete x category.
struct BoxGroup {
    center: f64,
    color: Color,
    first_row: usize,
    samples: Vec<(usize, f64)>,
}

/// Pixel positions of the box hinges and median.
#[derive(Debug, Clone, Copy)]
struct BoxPixels {
    q1: f64,
    median: f64,
    q3: f64,
}

impl BoxPixels {
    fn project(ctx: &GeomContext<'_>, summary: &QuartileSummary) -> Option<Self> {
        Some(Self {
            q1: ctx.y.map_number(summary.q1)?,
            median: ctx.y.map_number(summary.median)?,
            q3: ctx.y.map_number(summary.q3)?,
        })
    }
}

/// Draws one box per x category whose quartiles project onto the y scale.
///
/// The x scale is discrete by the time this runs.
pub(super) fn render_box_plot(
    scene: &mut Scene,
    group: NodeId,
    ctx: &GeomContext<'_>,
    rng: &mut StdRng,
) {
    let aes = &ctx.layer.aes;
    let mut groups: IndexMap<String, BoxGroup> = IndexMap::new();
    for (index, row) in ctx.layer.data.iter().enumerate() {
        let color = ctx.paint.color(ctx.layer, row);
        let Some(key) = aes.x_value(row).key() else {
            continue;
        };
        let Some(center) = ctx.x.map(&aes.x_value(row)) else {
            continue;
        };
        let entry = groups.entry(key).or_insert_with(|| BoxGroup {
            center,
            color,
            first_row: index,
            samples: Vec::new(),
        });
        if let Some(value) = aes.y_value(row).as_number() {
            entry.samples.push((index, value));
        }
    }

    // Groups without a drawable box exit here so no stale parts survive.
    let summaries: Vec<(String, BoxGroup, QuartileSummary, BoxPixels)> = groups
        .into_iter()
        .filter_map(|(key, group)| {
            let summary = QuartileSummary::from_samples(group.samples.iter().map(|(_, v)| *v))?;
            let pixels = BoxPixels::project(ctx, &summary)?;
            Some((key, group, summary, pixels))
        })
        .collect();

    let keys: Vec<&str> = summaries.iter().map(|(key, ..)| key.as_str()).collect();
    let ids = scene.reconcile_children(group, Geom::BoxPlot.class(), &keys, NodeKind::Group);
    let box_width = ctx.x.band_width() * ctx.layer.options.box_width_ratio;
    let mut outliers: Vec<Glyph> = Vec::new();

    for (id, (key, box_group, summary, pixels)) in ids.into_iter().zip(&summaries) {
        if let Some(node) = scene.node_mut(id) {
            node.datum = NodeDatum::Row {
                layer: ctx.layer_index,
                row: box_group.first_row,
            };
            node.title = Some(format!(
                "{key}\nQ1: {}\nmedian: {}\nQ3: {}",
                ctx.y.format_hover(&summary.q1.into()),
                ctx.y.format_hover(&summary.median.into()),
                ctx.y.format_hover(&summary.q3.into()),
            ));
        }
        draw_box(scene, id, ctx, box_group, summary, *pixels, box_width);

        if ctx.layer.options.show_outliers {
            for (row_index, value) in &box_group.samples {
                if !summary.is_outlier(*value) {
                    continue;
                }
                let Some(y) = ctx.y.map_number(*value) else {
                    continue;
                };
                let row = &ctx.layer.data[*row_index];
                outliers.push(point_glyph(
                    ctx,
                    *row_index,
                    row,
                    box_group.center,
                    y,
                    format!("{key}|{row_index}"),
                    rng,
                ));
            }
        }
        trace!(
            layer = %ctx.layer.name,
            category = %key,
            samples = summary.sorted_values.len(),
            "box summary"
        );
    }

    draw_glyphs(scene, group, OUTLIER_CLASS, &outliers, ctx);
}

fn draw_box(
    scene: &mut Scene,
    id: NodeId,
    ctx: &GeomContext<'_>,
    box_group: &BoxGroup,
    summary: &QuartileSummary,
    pixels: BoxPixels,
    box_width: f64,
) {
    let BoxPixels { q1, median, q3 } = pixels;
    let left = box_group.center - box_width / 2.0;
    let right = box_group.center + box_width / 2.0;
    let line_width = ctx.layer.style.line_width;
    let color = box_group.color;

    upsert_child(
        scene,
        id,
        "box-body",
        NodeKind::rect(left, q1.min(q3), box_width, (q1 - q3).abs()),
        NodeStyle::filled(color.with_alpha(color.alpha * BOX_FILL_ALPHA))
            .with_stroke(color, line_width),
    );
    upsert_child(
        scene,
        id,
        "box-median",
        NodeKind::Path {
            d: PathData::segment(left, median, right, median),
        },
        NodeStyle::stroked(color, line_width * MEDIAN_WIDTH_FACTOR),
    );

    let cap = ctx.layer.options.cap_width_px / 2.0;
    for (class, whisker, hinge) in [
        ("box-whisker box-whisker-upper", summary.upper_whisker(), q3),
        ("box-whisker box-whisker-lower", summary.lower_whisker(), q1),
    ] {
        match whisker.and_then(|value| ctx.y.map_number(value)) {
            Some(end) => {
                let mut d = PathData::segment(box_group.center, hinge, box_group.center, end);
                d.move_to(box_group.center - cap, end);
                d.line_to(box_group.center + cap, end);
                upsert_child(
                    scene,
                    id,
                    class,
                    NodeKind::Path { d },
                    NodeStyle::stroked(color, line_width),
                );
            }
            None => scene.remove_child(id, class),
        }
    }
}
