/// Measures rendered text so layout can detect collisions without a backend.
pub trait TextMeasurer {
    /// Width in px of `text` drawn at `font_size_px`.
    fn text_width(&self, text: &str, font_size_px: f64) -> f64;

    /// Line height in px for `font_size_px`.
    fn line_height(&self, font_size_px: f64) -> f64 {
        font_size_px * 1.2
    }
}

/// Deterministic per-glyph width estimate for a sans-serif face.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasurer;

impl TextMeasurer for ApproxTextMeasurer {
    fn text_width(&self, text: &str, font_size_px: f64) -> f64 {
        let units = text.chars().fold(0.0, |acc, ch| {
            acc + match ch {
                '0'..='9' => 0.62,
                '.' | ',' | ':' | ';' | '\'' | '|' | 'i' | 'l' | 'j' => 0.3,
                '-' | '+' | '%' | '(' | ')' => 0.42,
                ' ' => 0.33,
                'm' | 'w' | 'M' | 'W' => 0.86,
                ch if ch.is_uppercase() => 0.68,
                _ => 0.56,
            }
        });
        units * font_size_px
    }
}

/// Greedy word wrap into lines no wider than `max_width`.
///
/// A single word wider than the limit stays on its own line.
#[must_use]
pub fn wrap_words(
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size_px: f64,
    max_width: f64,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measurer.text_width(&candidate, font_size_px) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{ApproxTextMeasurer, TextMeasurer, wrap_words};

    #[test]
    fn wider_text_measures_wider() {
        let measurer = ApproxTextMeasurer;
        assert!(measurer.text_width("1000", 10.0) > measurer.text_width("10", 10.0));
        assert_eq!(measurer.text_width("", 10.0), 0.0);
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let measurer = ApproxTextMeasurer;
        let lines = wrap_words(&measurer, "alpha beta gamma", 10.0, 60.0);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
        assert!(wrap_words(&measurer, "   ", 10.0, 60.0).is_empty());
    }
}
