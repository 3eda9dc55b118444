use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{Aes, ColorScale, Margins, PlotGrid, Row, Scale, ShapeScale, Viewport};
use crate::interaction::PointerEvent;
use crate::render::{Color, ShapeKind};

/// Drawable shape kind of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Geom {
    Point,
    Path,
    ErrorBar,
    BoxPlot,
}

impl Geom {
    /// Scene class of the nodes drawn for one datum of this geom.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Point => "geom-point",
            Self::Path => "geom-path",
            Self::ErrorBar => "geom-errorbar",
            Self::BoxPlot => "geom-boxplot",
        }
    }
}

/// Which vertical scale a layer is projected through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum YAxisSide {
    #[default]
    Left,
    Right,
}

/// Row-level pointer event delivered to layer handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPointerEvent {
    pub pointer: PointerEvent,
    pub layer_index: usize,
    pub layer_name: String,
    pub row_index: usize,
    pub row: Row,
}

pub type PointerHandler = Arc<dyn Fn(&RowPointerEvent) + Send + Sync>;

/// Optional glyph handlers; unset slots clear the binding on the next render.
#[derive(Clone, Default)]
pub struct LayerHandlers {
    pub on_click: Option<PointerHandler>,
    pub on_hover: Option<PointerHandler>,
    pub on_mouseout: Option<PointerHandler>,
}

impl fmt::Debug for LayerHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerHandlers")
            .field("on_click", &self.on_click.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .field("on_mouseout", &self.on_mouseout.is_some())
            .finish()
    }
}

impl LayerHandlers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_click.is_none() && self.on_hover.is_none() && self.on_mouseout.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub color: Color,
    /// Used when `aes.color` is mapped.
    pub color_scale: Option<ColorScale>,
    pub shape: ShapeKind,
    /// Used when `aes.shape` is mapped; falls back to the plot's shape scale.
    pub shape_scale: Option<ShapeScale>,
    pub opacity: f64,
    /// Glyph area in px².
    pub size: f64,
    pub line_width: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0.122, 0.467, 0.706),
            color_scale: None,
            shape: ShapeKind::Circle,
            shape_scale: None,
            opacity: 1.0,
            size: 64.0,
            line_width: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeomOptions {
    /// Perturb point positions inside their discrete band.
    pub jitter: bool,
    /// Draw box-plot samples outside the whisker fences as glyphs.
    pub show_outliers: bool,
    /// Box width as a fraction of the band width.
    pub box_width_ratio: f64,
    pub cap_width_px: f64,
}

impl Default for GeomOptions {
    fn default() -> Self {
        Self {
            jitter: false,
            show_outliers: false,
            box_width_ratio: 0.6,
            cap_width_px: 8.0,
        }
    }
}

/// One geom + aes + data + style, rendered independently of other layers.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub geom: Geom,
    pub aes: Aes,
    pub data: Arc<Vec<Row>>,
    pub y_axis: YAxisSide,
    pub style: LayerStyle,
    pub options: GeomOptions,
    pub handlers: LayerHandlers,
}

impl Layer {
    #[must_use]
    pub fn new(name: impl Into<String>, geom: Geom, aes: Aes, data: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            geom,
            aes,
            data: Arc::new(data),
            y_axis: YAxisSide::Left,
            style: LayerStyle::default(),
            options: GeomOptions::default(),
            handlers: LayerHandlers::default(),
        }
    }

    #[must_use]
    pub fn with_shared_data(mut self, data: Arc<Vec<Row>>) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn on_y_axis(mut self, side: YAxisSide) -> Self {
        self.y_axis = side;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    #[must_use]
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.style.color_scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_shape_scale(mut self, scale: ShapeScale) -> Self {
        self.style.shape_scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: GeomOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_handlers(mut self, handlers: LayerHandlers) -> Self {
        self.handlers = handlers;
        self
    }
}

/// Scales keyed by role.
#[derive(Debug, Clone, Default)]
pub struct ScaleSet {
    pub x: Option<Scale>,
    pub y_left: Option<Scale>,
    pub y_right: Option<Scale>,
    pub shape: Option<ShapeScale>,
}

impl ScaleSet {
    #[must_use]
    pub fn y_for(&self, side: YAxisSide) -> Option<&Scale> {
        match side {
            YAxisSide::Left => self.y_left.as_ref(),
            YAxisSide::Right => self.y_right.as_ref(),
        }
    }

    /// Scale used by the vertical brush: left when present, otherwise right.
    #[must_use]
    pub fn primary_y(&self) -> Option<&Scale> {
        self.y_left.as_ref().or(self.y_right.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotLabel {
    pub text: String,
    /// Draw a click overlay that emits `LabelClickEvent`.
    pub clickable: bool,
}

impl PlotLabel {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            clickable: false,
        }
    }

    #[must_use]
    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }
}

/// Chart label that can carry a click overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelTarget {
    Title,
    X,
    YLeft,
    YRight,
}

impl LabelTarget {
    pub const ALL: [Self; 4] = [Self::Title, Self::X, Self::YLeft, Self::YRight];

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Title => "label-title",
            Self::X => "label-x",
            Self::YLeft => "label-y-left",
            Self::YRight => "label-y-right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlotLabels {
    pub title: Option<PlotLabel>,
    pub x: Option<PlotLabel>,
    pub y_left: Option<PlotLabel>,
    pub y_right: Option<PlotLabel>,
}

impl PlotLabels {
    #[must_use]
    pub fn get(&self, target: LabelTarget) -> Option<&PlotLabel> {
        match target {
            LabelTarget::Title => self.title.as_ref(),
            LabelTarget::X => self.x.as_ref(),
            LabelTarget::YLeft => self.y_left.as_ref(),
            LabelTarget::YRight => self.y_right.as_ref(),
        }
    }

    #[must_use]
    pub fn any_clickable(&self) -> bool {
        [&self.title, &self.x, &self.y_left, &self.y_right]
            .into_iter()
            .flatten()
            .any(|label| label.clickable)
    }
}

/// Which brush surfaces are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushConfig {
    pub x: bool,
    pub y: bool,
    /// Draw the edge handle brushes below and left of the plot area.
    pub handles: bool,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            x: true,
            y: true,
            handles: true,
        }
    }
}

/// Declarative description of one chart, re-read on every render.
#[derive(Debug, Clone)]
pub struct Plot {
    pub viewport: Viewport,
    pub grid: PlotGrid,
    pub scales: ScaleSet,
    pub layers: Vec<Layer>,
    pub labels: PlotLabels,
    pub brush: Option<BrushConfig>,
    pub show_legend: bool,
    pub clip: bool,
}

impl Plot {
    /// Plot with default margins and no scales or layers.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            grid: PlotGrid::from_viewport(viewport, Margins::default()),
            scales: ScaleSet::default(),
            layers: Vec::new(),
            labels: PlotLabels::default(),
            brush: None,
            show_legend: true,
            clip: true,
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.grid = PlotGrid::from_viewport(self.viewport, margins);
        self
    }

    #[must_use]
    pub fn with_x_scale(mut self, scale: Scale) -> Self {
        self.scales.x = Some(scale);
        self
    }

    #[must_use]
    pub fn with_y_left_scale(mut self, scale: Scale) -> Self {
        self.scales.y_left = Some(scale);
        self
    }

    #[must_use]
    pub fn with_y_right_scale(mut self, scale: Scale) -> Self {
        self.scales.y_right = Some(scale);
        self
    }

    #[must_use]
    pub fn with_shape_scale(mut self, scale: ShapeScale) -> Self {
        self.scales.shape = Some(scale);
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: PlotLabels) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_brush(mut self, brush: BrushConfig) -> Self {
        self.brush = Some(brush);
        self
    }

    #[must_use]
    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    #[must_use]
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// X range spanning the plot width, for callers building scales.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.grid.left, self.grid.right)
    }

    /// Y range from the bottom edge up to the top edge.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        (self.grid.bottom, self.grid.top)
    }
}
