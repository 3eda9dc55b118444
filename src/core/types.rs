use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Space reserved around the plot area for axes, labels and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    #[must_use]
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(60.0, 160.0, 40.0, 50.0)
    }
}

/// Plot-area geometry in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotGrid {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotGrid {
    #[must_use]
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Derives plot edges from the viewport minus margins.
    #[must_use]
    pub fn from_viewport(viewport: Viewport, margins: Margins) -> Self {
        Self::new(
            margins.left,
            f64::from(viewport.width) - margins.right,
            margins.top,
            f64::from(viewport.height) - margins.bottom,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (name, value) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "plot grid edge `{name}` must be finite"
                )));
            }
        }
        if self.right <= self.left || self.bottom <= self.top {
            return Err(ChartError::Configuration(format!(
                "plot area is empty: {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Returns the grid grown by `margin` pixels on every side.
    #[must_use]
    pub fn expanded(self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.right + margin,
            self.top - margin,
            self.bottom + margin,
        )
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Axis-aligned pixel box used for label and legend collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}
