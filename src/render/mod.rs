mod null_renderer;
mod primitives;
mod reconcile;
mod scene;
pub mod svg;
mod text_metrics;

pub use null_renderer::NullRenderer;
pub use primitives::{Color, PathCommand, PathData, ShapeKind, TextAnchor, TextBaseline};
pub use reconcile::{ReconcilePlan, disambiguate_keys, plan_reconciliation};
pub use scene::{
    NodeDatum, NodeId, NodeKind, NodeSnapshot, NodeStyle, ROOT_CLASS, Scene, SceneNode,
    SceneSnapshot, has_class,
};
pub use svg::{SvgRenderer, scene_to_svg};
pub use text_metrics::{ApproxTextMeasurer, TextMeasurer, wrap_words};

pub(crate) use primitives::fmt_coord;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the fully reconciled `Scene` so drawing code stays
/// isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, scene: &Scene) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
