use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::Plot;
use crate::error::ChartResult;
use crate::interaction::BrushState;
use crate::render::{
    ApproxTextMeasurer, Color, NodeId, Renderer, Scene, SceneSnapshot, TextMeasurer, scene_to_svg,
};

use super::brush_controller::BrushController;
use super::render_coordinator::RenderCoordinator;
use super::{BrushExtent, ChartConfig, ChartEventListener, RenderReport, TestControl};

/// Main facade consumed by host applications.
///
/// `Chart` owns the retained scene, the brush state and the event listener,
/// and hands every finished scene to its renderer.
pub struct Chart<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartConfig,
    pub(super) palette: Vec<Color>,
    pub(super) scene: Option<Scene>,
    pub(super) brush: BrushController,
    pub(super) rng: StdRng,
    pub(super) listener: Option<Box<dyn ChartEventListener>>,
    pub(super) measurer: Box<dyn TextMeasurer>,
    pub(super) hovered: Option<NodeId>,
    pub(super) last_plot: Option<Plot>,
}

impl<R: Renderer> Chart<R> {
    /// Chart with the default configuration.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        let config = ChartConfig::default();
        let palette = config.palette_colors().unwrap_or_default();
        Self::from_parts(renderer, config, palette)
    }

    pub fn with_config(renderer: R, config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        let palette = config.palette_colors()?;
        Ok(Self::from_parts(renderer, config, palette))
    }

    fn from_parts(renderer: R, config: ChartConfig, palette: Vec<Color>) -> Self {
        Self {
            renderer,
            config,
            palette,
            scene: None,
            brush: BrushController::default(),
            rng: StdRng::from_entropy(),
            listener: None,
            measurer: Box::new(ApproxTextMeasurer),
            hovered: None,
            last_plot: None,
        }
    }

    /// Draws `plot`, reconciling against the previous render.
    ///
    /// Configuration problems are drawn as an in-chart message and reported
    /// through [`RenderReport::status`]; contract violations return `Err`.
    pub fn render(&mut self, plot: &Plot) -> ChartResult<RenderReport> {
        RenderCoordinator::render(self, plot)
    }

    /// Tears the scene down to an empty root and drops brush state.
    pub fn clear(&mut self) -> ChartResult<()> {
        self.brush.reset();
        self.hovered = None;
        self.last_plot = None;
        match self.scene.as_mut() {
            Some(scene) => {
                scene.clear();
                self.renderer.render(scene)
            }
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.palette = config.palette_colors()?;
        self.config = config;
        Ok(())
    }

    pub fn set_event_listener(&mut self, listener: impl ChartEventListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_event_listener(&mut self) {
        self.listener = None;
    }

    /// Replaces the measurer used for label collision and legend wrapping.
    pub fn set_text_measurer(&mut self, measurer: impl TextMeasurer + 'static) {
        self.measurer = Box::new(measurer);
    }

    #[must_use]
    pub fn brush_state(&self) -> BrushState {
        self.brush.state()
    }

    /// Data extent of the brush; `None` while nothing is selected.
    #[must_use]
    pub fn brush_extent(&self) -> Option<BrushExtent> {
        self.brush.extent()
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<SceneSnapshot> {
        self.scene.as_ref().map(Scene::snapshot)
    }

    /// SVG document of the current scene.
    #[must_use]
    pub fn to_svg(&self) -> Option<String> {
        self.scene.as_ref().map(scene_to_svg)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Deterministic hooks for tests: jitter seed and scripted gestures.
    pub fn test_control(&mut self) -> TestControl<'_, R> {
        TestControl::new(self)
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
