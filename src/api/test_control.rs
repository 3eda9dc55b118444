use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::LabelTarget;
use crate::error::ChartResult;
use crate::interaction::BrushTarget;
use crate::render::{NodeDatum, Renderer, SceneSnapshot};

use super::Chart;

/// Deterministic hooks over a chart for tests and headless drivers.
///
/// Gestures run through the same path as host pointer input, so listeners
/// observe the usual start/brush/end sequence.
pub struct TestControl<'a, R: Renderer> {
    chart: &'a mut Chart<R>,
}

impl<'a, R: Renderer> TestControl<'a, R> {
    pub(super) fn new(chart: &'a mut Chart<R>) -> Self {
        Self { chart }
    }

    /// Reseeds the jitter source; call before each render to make it repeatable.
    pub fn set_jitter_seed(&mut self, seed: u64) {
        self.chart.rng = StdRng::seed_from_u64(seed);
    }

    /// Drags the x handle strip from pixel `x0` to `x1`.
    pub fn brush_x(&mut self, x0: f64, x1: f64) -> ChartResult<bool> {
        let Some((_, y)) = self.chart.brush.surface_center(BrushTarget::XHandle) else {
            return Ok(false);
        };
        self.chart.drive_brush(BrushTarget::XHandle, (x0, y), (x1, y))
    }

    /// Drags the y handle strip from pixel `y0` to `y1`.
    pub fn brush_y(&mut self, y0: f64, y1: f64) -> ChartResult<bool> {
        let Some((x, _)) = self.chart.brush.surface_center(BrushTarget::YHandle) else {
            return Ok(false);
        };
        self.chart.drive_brush(BrushTarget::YHandle, (x, y0), (x, y1))
    }

    /// Drags across the main brush surface.
    pub fn brush_main(&mut self, from: (f64, f64), to: (f64, f64)) -> ChartResult<bool> {
        self.chart.drive_brush(BrushTarget::Main, from, to)
    }

    /// Clicks the centre of the overlay for `target`; `false` when none is drawn.
    pub fn click_label(&mut self, target: LabelTarget) -> ChartResult<bool> {
        let center = self.chart.scene.as_ref().and_then(|scene| {
            scene
                .walk()
                .into_iter()
                .map(|(node, _)| node)
                .find(|node| node.datum == NodeDatum::Label(target))
                .and_then(|node| scene.node_center(node.id))
        });
        match center {
            Some((x, y)) => self.chart.click(x, y),
            None => Ok(false),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<SceneSnapshot> {
        self.chart.snapshot()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.chart.scene.as_ref().map_or(0, |scene| scene.len())
    }
}
