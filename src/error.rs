use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A required scale is missing or cannot be drawn (degenerate or invalid domain).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The requested geom cannot be drawn against the configured scales.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// The plot asks for an interaction whose consumer was never registered.
    #[error("missing callback: {0}")]
    MissingCallback(String),

    #[error("render backend error: {0}")]
    Backend(String),
}

impl ChartError {
    /// Returns `true` for errors that are degraded to an in-chart message
    /// instead of being returned from `Chart::render`.
    #[must_use]
    pub fn is_presentable(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::UnsupportedGeometry(_))
    }
}
