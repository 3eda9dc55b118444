use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::Value;

/// Custom number formatter supplied by the host.
pub type FormatFn = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Policy used for tick labels and hover text of a scale.
#[derive(Clone, Default)]
pub enum TickFormat {
    /// Precision derived from the tick step; trailing zeros are dropped.
    #[default]
    Auto,
    /// Fixed number of decimals.
    Fixed(usize),
    /// Value multiplied by 100 with a `%` suffix.
    Percent(usize),
    Scientific(usize),
    /// Interpret values as unix seconds and format in UTC with a `chrono` pattern.
    DateTime(String),
    Custom(FormatFn),
}

impl fmt::Debug for TickFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Fixed(precision) => f.debug_tuple("Fixed").field(precision).finish(),
            Self::Percent(precision) => f.debug_tuple("Percent").field(precision).finish(),
            Self::Scientific(precision) => f.debug_tuple("Scientific").field(precision).finish(),
            Self::DateTime(pattern) => f.debug_tuple("DateTime").field(pattern).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl TickFormat {
    #[must_use]
    pub fn custom(format: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(format))
    }

    #[must_use]
    pub fn date_time(pattern: impl Into<String>) -> Self {
        Self::DateTime(pattern.into())
    }

    /// Formats one number. `step` is the distance between neighbouring ticks,
    /// when known, and drives `Auto` precision.
    #[must_use]
    pub fn format_number(&self, value: f64, step: Option<f64>) -> String {
        if !value.is_finite() {
            return "nan".to_owned();
        }
        match self {
            Self::Auto => format_auto(value, step),
            Self::Fixed(precision) => format!("{value:.precision$}"),
            Self::Percent(precision) => format!("{:.precision$}%", value * 100.0),
            Self::Scientific(precision) => format!("{value:.precision$e}"),
            Self::DateTime(pattern) => format_unix_seconds(value, pattern),
            Self::Custom(format) => format(value),
        }
    }

    /// Formats a cell for hover text: numbers go through the policy, other values
    /// print their category key.
    #[must_use]
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Number(number) => self.format_number(*number, None),
            other => other.key().unwrap_or_default(),
        }
    }
}

fn format_auto(value: f64, step: Option<f64>) -> String {
    let precision = match step {
        Some(step) if step.is_finite() && step > 0.0 => {
            let magnitude = step.log10().floor();
            if magnitude >= 0.0 {
                0
            } else {
                (-magnitude) as usize
            }
        }
        _ => 6,
    };
    trim_trailing_zeros(format!("{value:.precision$}"))
}

fn trim_trailing_zeros(text: String) -> String {
    if !text.contains('.') {
        return normalize_negative_zero(text);
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    normalize_negative_zero(trimmed.to_owned())
}

fn normalize_negative_zero(text: String) -> String {
    if text == "-0" { "0".to_owned() } else { text }
}

fn format_unix_seconds(value: f64, pattern: &str) -> String {
    let seconds = value.floor();
    let nanos = ((value - seconds) * 1_000_000_000.0).round() as u32;
    let Some(dt) = DateTime::<Utc>::from_timestamp(seconds as i64, nanos.min(999_999_999)) else {
        return format_auto(value, None);
    };
    dt.format(pattern).to_string()
}
