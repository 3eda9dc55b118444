use crate::render::{Color, ShapeKind, TextMeasurer, wrap_words};

/// Gap between the glyph column and the label text.
const LABEL_GAP_PX: f64 = 6.0;

/// One series entry discovered while drawing layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub layer_name: String,
    pub key: String,
    pub label: String,
    pub color: Color,
    pub shape: ShapeKind,
    /// Draw a line swatch instead of a symbol.
    pub line: bool,
}

impl LegendItem {
    /// Reconciliation key, unique per `(layer, key)` pair.
    #[must_use]
    pub fn entry_key(&self) -> String {
        format!("{}|{}", self.layer_name, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayoutParams {
    /// Left edge of the glyph column.
    pub x: f64,
    /// Vertical centre of the first entry's first line.
    pub start_y: f64,
    pub entry_spacing: f64,
    /// Extra separation added to the overlap when pushing an entry down.
    pub gap: f64,
    /// Horizontal space available for glyph plus label.
    pub max_width: f64,
    pub font_size: f64,
    pub glyph_size: f64,
}

impl LegendLayoutParams {
    #[must_use]
    pub fn glyph_extent(self) -> f64 {
        ShapeKind::Circle.hit_radius(self.glyph_size) * 2.0
    }

    #[must_use]
    pub fn label_offset(self) -> f64 {
        self.glyph_extent() + LABEL_GAP_PX
    }
}

/// Final position of one legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntryLayout {
    pub key: String,
    pub x: f64,
    /// Vertical centre of the first line.
    pub y: f64,
    pub lines: Vec<String>,
    pub height: f64,
}

impl LegendEntryLayout {
    #[must_use]
    pub fn top(&self, line_height: f64) -> f64 {
        self.y - line_height / 2.0
    }

    #[must_use]
    pub fn bottom(&self, line_height: f64) -> f64 {
        self.top(line_height) + self.height
    }
}

/// Stacks entries at `start_y + i * entry_spacing`, wraps their labels and
/// then pushes each entry below the one before it when they overlap.
#[must_use]
pub fn layout_legend(
    items: &[LegendItem],
    params: LegendLayoutParams,
    measurer: &dyn TextMeasurer,
) -> Vec<LegendEntryLayout> {
    let line_height = measurer.line_height(params.font_size);
    let text_width = (params.max_width - params.label_offset()).max(0.0);

    let mut entries: Vec<LegendEntryLayout> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut lines = wrap_words(measurer, &item.label, params.font_size, text_width);
            if lines.is_empty() {
                lines.push(String::new());
            }
            let height = (lines.len() as f64 * line_height).max(params.glyph_extent());
            LegendEntryLayout {
                key: item.entry_key(),
                x: params.x,
                y: params.start_y + index as f64 * params.entry_spacing,
                lines,
                height,
            }
        })
        .collect();

    for index in 1..entries.len() {
        let previous_bottom = entries[index - 1].bottom(line_height);
        let overlap = previous_bottom - entries[index].top(line_height);
        if overlap > 0.0 {
            entries[index].y += overlap + params.gap;
        }
    }
    entries
}
