mod axis_renderer;
mod box_plot_renderer;
mod brush_controller;
mod chart;
mod chart_config;
mod chart_events;
mod clip_region;
mod error_bar_renderer;
mod label_renderer;
mod layer_renderer;
mod legend_layout;
mod legend_renderer;
mod message_renderer;
mod path_renderer;
mod plot_validation;
mod point_renderer;
mod pointer_dispatch;
mod render_coordinator;
mod render_report;
mod test_control;

pub use axis_renderer::{
    AxisLayout, AxisOrientation, AxisSpec, labels_collide, render_axis,
};
pub use chart::Chart;
pub use chart_config::ChartConfig;
pub use chart_events::{
    AxisExtent, BrushEvent, BrushEventKind, BrushExtent, ChartEventListener, LabelClickEvent,
    LayerSelection,
};
pub use legend_layout::{LegendEntryLayout, LegendItem, LegendLayoutParams, layout_legend};
pub use render_report::{RenderReport, RenderStatus};
pub use test_control::TestControl;
