//! statchart-rs: retained-mode statistical chart engine.
//!
//! A [`Plot`](core::Plot) describes scales, data layers and interaction
//! settings; a [`Chart`] reconciles it into a [`Scene`](render::Scene)
//! and hands the scene to a [`Renderer`](render::Renderer) backend.
//! Point, path, error-bar and box-plot geoms are supported, together with
//! collision-aware axes, a wrapping legend and a linked x/y brush.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Chart, ChartConfig, ChartEventListener, RenderReport, RenderStatus};
pub use error::{ChartError, ChartResult};
