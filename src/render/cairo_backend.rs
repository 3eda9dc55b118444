use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, NodeId, NodeKind, NodeStyle, PathCommand, PathData, Renderer, Scene, TextAnchor,
    TextBaseline,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub paths_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a host widget's draw callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(&mut self, context: &Context, scene: &Scene) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo raster backend.
///
/// Renders into an offscreen ARGB surface through `Renderer::render`, or onto
/// an external context through `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Writes the current surface as PNG.
    pub fn write_png(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        let mut file = File::create(path.as_ref()).map_err(|err| {
            ChartError::Backend(format!(
                "failed to create `{}`: {err}",
                path.as_ref().display()
            ))
        })?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|err| ChartError::Backend(format!("failed to encode png: {err}")))
    }

    fn render_with_context(&mut self, context: &Context, scene: &Scene) -> ChartResult<()> {
        scene.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        draw_node(context, scene, scene.root(), &mut stats)?;
        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, scene: &Scene) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, scene)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(&mut self, context: &Context, scene: &Scene) -> ChartResult<()> {
        self.render_with_context(context, scene)
    }
}

fn draw_node(
    context: &Context,
    scene: &Scene,
    id: NodeId,
    stats: &mut CairoRenderStats,
) -> ChartResult<()> {
    let Some(node) = scene.node(id) else {
        return Ok(());
    };
    if matches!(node.kind, NodeKind::ClipRect { .. }) {
        return Ok(());
    }

    context
        .save()
        .map_err(|err| map_backend_error("failed to save context", err))?;
    if let Some(NodeKind::ClipRect {
        x,
        y,
        width,
        height,
    }) = node.clip.and_then(|clip| scene.node(clip)).map(|clip| &clip.kind)
    {
        context.rectangle(*x, *y, *width, *height);
        context.clip();
    }
    if let Some((dx, dy)) = node.translate {
        context.translate(dx, dy);
    }

    match &node.kind {
        NodeKind::Group | NodeKind::ClipRect { .. } => {
            let translucent = node.style.opacity < 1.0;
            if translucent {
                context.push_group();
            }
            for child in node.children() {
                draw_node(context, scene, *child, stats)?;
            }
            if translucent {
                context
                    .pop_group_to_source()
                    .map_err(|err| map_backend_error("failed to pop group", err))?;
                context
                    .paint_with_alpha(node.style.opacity)
                    .map_err(|err| map_backend_error("failed to composite group", err))?;
            }
        }
        NodeKind::Path { d } => {
            append_path(context, d);
            paint_current_path(context, node.style)?;
            stats.paths_drawn += 1;
        }
        NodeKind::Rect {
            x,
            y,
            width,
            height,
        } => {
            context.rectangle(*x, *y, *width, *height);
            paint_current_path(context, node.style)?;
            stats.rects_drawn += 1;
        }
        NodeKind::Text {
            x,
            y,
            content,
            anchor,
            baseline,
            rotate,
            font_size,
        } => {
            let layout = pangocairo::functions::create_layout(context);
            let font_description = FontDescription::from_string(&format!("Sans {font_size}px"));
            layout.set_font_description(Some(&font_description));
            layout.set_text(content);

            let (text_width, text_height) = layout.pixel_size();
            let dx = match anchor {
                TextAnchor::Start => 0.0,
                TextAnchor::Middle => -f64::from(text_width) / 2.0,
                TextAnchor::End => -f64::from(text_width),
            };
            let dy = match baseline {
                TextBaseline::Alphabetic => -f64::from(layout.baseline()) / f64::from(pango::SCALE),
                TextBaseline::Middle => -f64::from(text_height) / 2.0,
                TextBaseline::Hanging => 0.0,
            };

            context.translate(*x, *y);
            if *rotate != 0.0 {
                context.rotate(rotate * PI / 180.0);
            }
            apply_color(
                context,
                node.style.fill.unwrap_or(Color::BLACK).with_alpha(
                    node.style.fill.map_or(1.0, |fill| fill.alpha) * node.style.opacity,
                ),
            );
            context.move_to(dx, dy);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }
    }

    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore context", err))
}

fn append_path(context: &Context, path: &PathData) {
    let mut current = (0.0, 0.0);
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(x, y) => {
                context.move_to(x, y);
                current = (x, y);
            }
            PathCommand::LineTo(x, y) => {
                context.line_to(x, y);
                current = (x, y);
            }
            PathCommand::ArcTo { radius, x, y } => {
                // Half-circle arcs only: centre is the chord midpoint.
                let cx = (current.0 + x) / 2.0;
                let cy = (current.1 + y) / 2.0;
                let start = (current.1 - cy).atan2(current.0 - cx);
                context.arc(cx, cy, radius, start, start + PI);
                current = (x, y);
            }
            PathCommand::Close => context.close_path(),
        }
    }
}

fn paint_current_path(context: &Context, style: NodeStyle) -> ChartResult<()> {
    if let Some(fill) = style.fill {
        apply_color(context, fill.with_alpha(fill.alpha * style.opacity));
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill path", err))?;
    }
    if let Some(stroke) = style.stroke {
        apply_color(context, stroke.with_alpha(stroke.alpha * style.opacity));
        context.set_line_width(style.stroke_width);
        context
            .stroke_preserve()
            .map_err(|err| map_backend_error("failed to stroke path", err))?;
    }
    context.new_path();
    Ok(())
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
