use serde::{Deserialize, Serialize};

use crate::core::CATEGORY10;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Layout and paint constants for one chart instance.
///
/// Serializable so hosts can persist chart setup without inventing their own
/// format. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_x_tick_count")]
    pub x_tick_count: usize,
    #[serde(default = "default_y_tick_count")]
    pub y_tick_count: usize,
    #[serde(default = "default_tick_size_px")]
    pub tick_size_px: f64,
    #[serde(default = "default_tick_padding_px")]
    pub tick_padding_px: f64,
    #[serde(default = "default_tick_font_size_px")]
    pub tick_font_size_px: f64,
    #[serde(default = "default_label_font_size_px")]
    pub label_font_size_px: f64,
    #[serde(default = "default_title_font_size_px")]
    pub title_font_size_px: f64,
    /// Applied to every bottom tick label once any pair collides.
    #[serde(default = "default_label_rotation_deg")]
    pub label_rotation_deg: f64,
    /// Distance from the plot edge to the axis title.
    #[serde(default = "default_axis_label_offset_px")]
    pub axis_label_offset_px: f64,
    #[serde(default = "default_legend_offset_px")]
    pub legend_offset_px: f64,
    /// Extra legend offset when a right axis occupies the margin.
    #[serde(default = "default_legend_right_axis_offset_px")]
    pub legend_right_axis_offset_px: f64,
    #[serde(default = "default_legend_entry_spacing_px")]
    pub legend_entry_spacing_px: f64,
    #[serde(default = "default_legend_gap_px")]
    pub legend_gap_px: f64,
    #[serde(default = "default_legend_font_size_px")]
    pub legend_font_size_px: f64,
    #[serde(default = "default_legend_glyph_size_px")]
    pub legend_glyph_size_px: f64,
    #[serde(default = "default_clip_margin_px")]
    pub clip_margin_px: f64,
    #[serde(default = "default_brush_padding_px")]
    pub brush_padding_px: f64,
    #[serde(default = "default_brush_handle_thickness_px")]
    pub brush_handle_thickness_px: f64,
    /// Gap between the plot edge and a handle strip.
    #[serde(default = "default_brush_handle_offset_px")]
    pub brush_handle_offset_px: f64,
    #[serde(default = "default_axis_color")]
    pub axis_color: Color,
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_brush_color")]
    pub brush_color: Color,
    #[serde(default = "default_warning_color")]
    pub warning_color: Color,
    #[serde(default = "default_error_color")]
    pub error_color: Color,
    /// CSS colors used for data-driven color keys.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            x_tick_count: default_x_tick_count(),
            y_tick_count: default_y_tick_count(),
            tick_size_px: default_tick_size_px(),
            tick_padding_px: default_tick_padding_px(),
            tick_font_size_px: default_tick_font_size_px(),
            label_font_size_px: default_label_font_size_px(),
            title_font_size_px: default_title_font_size_px(),
            label_rotation_deg: default_label_rotation_deg(),
            axis_label_offset_px: default_axis_label_offset_px(),
            legend_offset_px: default_legend_offset_px(),
            legend_right_axis_offset_px: default_legend_right_axis_offset_px(),
            legend_entry_spacing_px: default_legend_entry_spacing_px(),
            legend_gap_px: default_legend_gap_px(),
            legend_font_size_px: default_legend_font_size_px(),
            legend_glyph_size_px: default_legend_glyph_size_px(),
            clip_margin_px: default_clip_margin_px(),
            brush_padding_px: default_brush_padding_px(),
            brush_handle_thickness_px: default_brush_handle_thickness_px(),
            brush_handle_offset_px: default_brush_handle_offset_px(),
            axis_color: default_axis_color(),
            grid_color: default_grid_color(),
            text_color: default_text_color(),
            brush_color: default_brush_color(),
            warning_color: default_warning_color(),
            error_color: default_error_color(),
            palette: default_palette(),
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> ChartResult<()> {
        if self.x_tick_count == 0 || self.y_tick_count == 0 {
            return Err(ChartError::InvalidData(
                "tick counts must be > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("tick_size_px", self.tick_size_px),
            ("tick_padding_px", self.tick_padding_px),
            ("axis_label_offset_px", self.axis_label_offset_px),
            ("legend_offset_px", self.legend_offset_px),
            ("legend_right_axis_offset_px", self.legend_right_axis_offset_px),
            ("legend_entry_spacing_px", self.legend_entry_spacing_px),
            ("legend_gap_px", self.legend_gap_px),
            ("clip_margin_px", self.clip_margin_px),
            ("brush_padding_px", self.brush_padding_px),
            ("brush_handle_offset_px", self.brush_handle_offset_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "`{name}` must be finite and >= 0"
                )));
            }
        }
        for (name, value) in [
            ("tick_font_size_px", self.tick_font_size_px),
            ("label_font_size_px", self.label_font_size_px),
            ("title_font_size_px", self.title_font_size_px),
            ("legend_font_size_px", self.legend_font_size_px),
            ("legend_glyph_size_px", self.legend_glyph_size_px),
            ("brush_handle_thickness_px", self.brush_handle_thickness_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        if !self.label_rotation_deg.is_finite() {
            return Err(ChartError::InvalidData(
                "`label_rotation_deg` must be finite".to_owned(),
            ));
        }
        for color in [
            self.axis_color,
            self.grid_color,
            self.text_color,
            self.brush_color,
            self.warning_color,
            self.error_color,
        ] {
            color.validate()?;
        }
        if self.palette.is_empty() {
            return Err(ChartError::InvalidData("palette must not be empty".to_owned()));
        }
        self.palette_colors().map(|_| ())
    }

    /// Parsed palette colors.
    pub fn palette_colors(&self) -> ChartResult<Vec<Color>> {
        self.palette.iter().map(|css| Color::parse(css)).collect()
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_x_tick_count() -> usize {
    8
}

fn default_y_tick_count() -> usize {
    6
}

fn default_tick_size_px() -> f64 {
    6.0
}

fn default_tick_padding_px() -> f64 {
    3.0
}

fn default_tick_font_size_px() -> f64 {
    11.0
}

fn default_label_font_size_px() -> f64 {
    12.0
}

fn default_title_font_size_px() -> f64 {
    14.0
}

fn default_label_rotation_deg() -> f64 {
    15.0
}

fn default_axis_label_offset_px() -> f64 {
    38.0
}

fn default_legend_offset_px() -> f64 {
    20.0
}

fn default_legend_right_axis_offset_px() -> f64 {
    50.0
}

fn default_legend_entry_spacing_px() -> f64 {
    20.0
}

fn default_legend_gap_px() -> f64 {
    4.0
}

fn default_legend_font_size_px() -> f64 {
    11.0
}

fn default_legend_glyph_size_px() -> f64 {
    64.0
}

fn default_clip_margin_px() -> f64 {
    10.0
}

fn default_brush_padding_px() -> f64 {
    5.0
}

fn default_brush_handle_thickness_px() -> f64 {
    10.0
}

fn default_brush_handle_offset_px() -> f64 {
    2.0
}

fn default_axis_color() -> Color {
    Color::rgb(0.2, 0.2, 0.2)
}

fn default_grid_color() -> Color {
    Color::rgb(0.9, 0.9, 0.9)
}

fn default_text_color() -> Color {
    Color::rgb(0.13, 0.13, 0.13)
}

fn default_brush_color() -> Color {
    Color::rgba(0.47, 0.47, 0.47, 0.3)
}

fn default_warning_color() -> Color {
    Color::rgb(0.8, 0.45, 0.0)
}

fn default_error_color() -> Color {
    Color::rgb(0.75, 0.1, 0.1)
}

fn default_palette() -> Vec<String> {
    CATEGORY10.iter().map(|hex| (*hex).to_owned()).collect()
}
