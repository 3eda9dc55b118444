use rand::rngs::StdRng;

use crate::core::{Channel, Geom, Row};
use crate::render::{NodeId, Scene};

use super::layer_renderer::{GeomContext, Glyph, draw_glyphs};

/// Draws one symbol per drawable row, keyed by row index.
pub(super) fn render_points(
    scene: &mut Scene,
    group: NodeId,
    ctx: &GeomContext<'_>,
    rng: &mut StdRng,
) {
    let glyphs: Vec<Glyph> = ctx
        .layer
        .data
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let (x, y) = ctx.project(row)?;
            Some(point_glyph(ctx, index, row, x, y, index.to_string(), rng))
        })
        .collect();
    draw_glyphs(scene, group, Geom::Point.class(), &glyphs, ctx);
}

/// Builds the glyph for `row` at pixel `(x, y)`, jittered when enabled.
pub(super) fn point_glyph(
    ctx: &GeomContext<'_>,
    index: usize,
    row: &Row,
    x: f64,
    y: f64,
    key: String,
    rng: &mut StdRng,
) -> Glyph {
    let x = if ctx.layer.options.jitter {
        ctx.x.jitter(x, rng)
    } else {
        x
    };
    let size = ctx
        .layer
        .aes
        .size
        .as_ref()
        .and_then(|channel| channel.eval(row).as_number())
        .filter(|size| *size > 0.0)
        .unwrap_or(ctx.layer.style.size);
    Glyph {
        key,
        x,
        y,
        row: index,
        color: ctx.paint.color(ctx.layer, row),
        shape: ctx.paint.shape(ctx.layer, row),
        size,
        title: Some(hover_title(ctx, row)),
    }
}

/// Hover text channel when mapped, otherwise `x: .., y: ..` through the
/// scales' hover formats.
fn hover_title(ctx: &GeomContext<'_>, row: &Row) -> String {
    let aes = &ctx.layer.aes;
    if let Some(text) = aes.hover_text.as_ref().and_then(|channel| channel.eval(row).key()) {
        return text;
    }
    let label = |channel: Option<&Channel>, fallback: &'static str| {
        channel.map_or(fallback.to_owned(), |channel| channel.label().to_owned())
    };
    format!(
        "{}: {}\n{}: {}",
        label(aes.x.as_ref(), "x"),
        ctx.x.format_hover(&aes.x_value(row)),
        label(aes.y.as_ref(), "y"),
        ctx.y.format_hover(&aes.y_value(row)),
    )
}
