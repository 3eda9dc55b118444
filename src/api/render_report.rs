use crate::error::ChartError;

/// Outcome of one render pass that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderStatus {
    Rendered,
    /// The chart was replaced by an error message.
    Failed(ChartError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub status: RenderStatus,
    /// Layers skipped for lack of drawable rows.
    pub empty_layers: Vec<String>,
    pub node_count: usize,
    pub legend_entries: usize,
    pub bottom_labels_rotated: bool,
}

impl RenderReport {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.status == RenderStatus::Rendered
    }

    #[must_use]
    pub fn error(&self) -> Option<&ChartError> {
        match &self.status {
            RenderStatus::Rendered => None,
            RenderStatus::Failed(error) => Some(error),
        }
    }
}
