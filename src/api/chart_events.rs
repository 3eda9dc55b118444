use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{LabelTarget, Row};
use crate::interaction::{BrushState, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushEventKind {
    Start,
    Brush,
    End,
    Clear,
}

/// Selected data range along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisExtent {
    /// Ascending `[min, max]` in data units.
    Continuous(f64, f64),
    /// Category keys whose band centre lies inside the selection.
    Categories(Vec<String>),
}

/// Data extent of the brush; an axis without a selection is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushExtent {
    pub x: Option<AxisExtent>,
    pub y: Option<AxisExtent>,
}

/// Rows of one layer falling inside the brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSelection {
    pub layer_index: usize,
    pub layer_name: String,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct BrushEvent {
    pub kind: BrushEventKind,
    /// Originating pointer input; `None` for programmatic clears.
    pub pointer: Option<PointerEvent>,
    pub state: BrushState,
    pub extent: Option<BrushExtent>,
    /// Data of every layer, in plot order.
    pub layer_data: Vec<Arc<Vec<Row>>>,
    pub selections: Vec<LayerSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelClickEvent {
    pub target: LabelTarget,
    pub pointer: PointerEvent,
}

/// Consumer of chart interaction events.
pub trait ChartEventListener {
    fn on_brush(&mut self, event: &BrushEvent);

    fn on_label_click(&mut self, _event: &LabelClickEvent) {}
}
