pub mod aes;
pub mod format;
pub mod palette;
pub mod plot;
pub mod quartile;
pub mod scale;
pub mod types;
pub mod value;

pub use aes::{Aes, Channel};
pub use format::TickFormat;
pub use palette::{CATEGORY10, ColorScale, ShapeScale, default_palette};
pub use plot::{
    BrushConfig, Geom, GeomOptions, LabelTarget, Layer, LayerHandlers, LayerStyle, Plot, PlotLabel,
    PlotLabels, PointerHandler, RowPointerEvent, ScaleSet, YAxisSide,
};
pub use quartile::{QuartileSummary, WHISKER_IQR_FACTOR};
pub use scale::{
    ContinuousScale, DiscreteScale, Scale, ScaleMapping, ScaleTransform, ScaleType, Tick,
};
pub use types::{BoundingBox, Margins, PlotGrid, Viewport};
pub use value::{Row, Value};
