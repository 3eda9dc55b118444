//! Self-contained SVG export of a [`Scene`].
//!
//! Every painted element carries its full paint in an inline `style`
//! attribute and clip regions are emitted as `<clipPath>` definitions, so the
//! document renders identically without any stylesheet.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{ChartError, ChartResult};
use crate::render::fmt_coord;
use crate::render::{NodeId, NodeKind, NodeStyle, Renderer, Scene, SceneNode};

/// Serializes the scene into an SVG document.
#[must_use]
pub fn scene_to_svg(scene: &Scene) -> String {
    let viewport = scene.viewport();
    let mut svg = String::with_capacity(scene.len() * 96);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = viewport.width,
        h = viewport.height
    );

    let clips: Vec<&SceneNode> = scene
        .walk()
        .into_iter()
        .map(|(node, _)| node)
        .filter(|node| matches!(node.kind, NodeKind::ClipRect { .. }))
        .collect();
    if !clips.is_empty() {
        svg.push_str("<defs>\n");
        for clip in clips {
            if let NodeKind::ClipRect {
                x,
                y,
                width,
                height,
            } = clip.kind
            {
                let _ = writeln!(
                    svg,
                    r#"<clipPath id="clip-{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    clip.id.raw(),
                    fmt_coord(x),
                    fmt_coord(y),
                    fmt_coord(width),
                    fmt_coord(height)
                );
            }
        }
        svg.push_str("</defs>\n");
    }

    write_node(scene, scene.root(), 0, &mut svg);
    svg.push_str("</svg>\n");
    svg
}

fn write_node(scene: &Scene, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = scene.node(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let mut attrs = format!(r#" class="{}""#, escape_xml(&node.class));
    if let Some((dx, dy)) = node.translate {
        let _ = write!(attrs, r#" transform="translate({},{})""#, fmt_coord(dx), fmt_coord(dy));
    }
    if let Some(clip) = node.clip {
        let _ = write!(attrs, r#" clip-path="url(#clip-{})""#, clip.raw());
    }
    let title = node
        .title
        .as_deref()
        .map(|title| format!("<title>{}</title>", escape_xml(title)))
        .unwrap_or_default();

    match &node.kind {
        NodeKind::ClipRect { .. } => {}
        NodeKind::Group => {
            // Group opacity composites the children as one layer.
            if node.style.opacity < 1.0 {
                let _ = write!(attrs, r#" style="opacity:{}""#, fmt_coord(node.style.opacity));
            }
            let _ = writeln!(out, "{indent}<g{attrs}>{title}");
            for child in node.children() {
                write_node(scene, *child, depth + 1, out);
            }
            let _ = writeln!(out, "{indent}</g>");
        }
        NodeKind::Path { d } => {
            let _ = writeln!(
                out,
                r#"{indent}<path{attrs} d="{}" style="{}">{title}</path>"#,
                d.to_svg(),
                style_attr(node.style, false)
            );
        }
        NodeKind::Rect {
            x,
            y,
            width,
            height,
        } => {
            let _ = writeln!(
                out,
                r#"{indent}<rect{attrs} x="{}" y="{}" width="{}" height="{}" style="{}">{title}</rect>"#,
                fmt_coord(*x),
                fmt_coord(*y),
                fmt_coord(*width),
                fmt_coord(*height),
                style_attr(node.style, false)
            );
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
            let rotation = if *rotate == 0.0 {
                String::new()
            } else {
                format!(
                    r#" transform="rotate({},{},{})""#,
                    fmt_coord(*rotate),
                    fmt_coord(*x),
                    fmt_coord(*y)
                )
            };
            let _ = writeln!(
                out,
                r#"{indent}<text{attrs} x="{}" y="{}"{rotation} style="{};font-size:{}px;font-family:sans-serif;text-anchor:{};dominant-baseline:{}">{}{title}</text>"#,
                fmt_coord(*x),
                fmt_coord(*y),
                style_attr(node.style, true),
                fmt_coord(*font_size),
                anchor.as_svg(),
                baseline.as_svg(),
                escape_xml(content)
            );
        }
    }
}

fn style_attr(style: NodeStyle, is_text: bool) -> String {
    let mut css = String::new();
    match style.fill {
        Some(fill) => {
            let _ = write!(css, "fill:{};fill-opacity:{}", fill.to_css_hex(), fmt_coord(fill.alpha));
        }
        // Text without an explicit fill still needs ink.
        None if is_text => css.push_str("fill:#000000"),
        None => css.push_str("fill:none"),
    }
    match style.stroke {
        Some(stroke) => {
            let _ = write!(
                css,
                ";stroke:{};stroke-opacity:{};stroke-width:{}",
                stroke.to_css_hex(),
                fmt_coord(stroke.alpha),
                fmt_coord(style.stroke_width)
            );
        }
        None => css.push_str(";stroke:none"),
    }
    if style.opacity < 1.0 {
        let _ = write!(css, ";opacity:{}", fmt_coord(style.opacity));
    }
    css
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renderer that keeps the SVG document of the last rendered scene.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    last_document: Option<String>,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        let document = self
            .last_document
            .as_deref()
            .ok_or_else(|| ChartError::Backend("nothing has been rendered yet".to_owned()))?;
        std::fs::write(path.as_ref(), document).map_err(|err| {
            ChartError::Backend(format!(
                "failed to write svg to `{}`: {err}",
                path.as_ref().display()
            ))
        })
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &Scene) -> ChartResult<()> {
        scene.validate()?;
        self.last_document = Some(scene_to_svg(scene));
        Ok(())
    }
}
