use indexmap::IndexSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{TickFormat, Value};
use crate::error::{ChartError, ChartResult};

/// Whether a scale maps numbers or category keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleType {
    Continuous,
    Discrete,
}

/// Numeric transform applied before the linear domain-to-range interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleTransform {
    #[default]
    Linear,
    /// Base-10 logarithm; the domain must be strictly positive.
    Log,
}

impl ScaleTransform {
    fn forward(self, value: f64) -> Option<f64> {
        match self {
            Self::Linear => Some(value),
            Self::Log if value > 0.0 => Some(value.log10()),
            Self::Log => None,
        }
    }

    fn inverse(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log => 10f64.powf(value),
        }
    }
}

/// Monotonic, invertible domain to pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    domain: (f64, f64),
    range: (f64, f64),
    transform: ScaleTransform,
}

impl ContinuousScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64), transform: ScaleTransform) -> Self {
        Self {
            domain,
            range,
            transform,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn transform(self) -> ScaleTransform {
        self.transform
    }

    pub fn validate(self) -> ChartResult<()> {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if !d0.is_finite() || !d1.is_finite() || d0 == d1 {
            return Err(ChartError::Configuration(format!(
                "scale domain must be finite and non-degenerate, got [{d0}, {d1}]"
            )));
        }
        if !r0.is_finite() || !r1.is_finite() || r0 == r1 {
            return Err(ChartError::Configuration(format!(
                "scale range must be finite and non-degenerate, got [{r0}, {r1}]"
            )));
        }
        if self.transform == ScaleTransform::Log && (d0 <= 0.0 || d1 <= 0.0) {
            return Err(ChartError::Configuration(format!(
                "log scale domain must be strictly positive, got [{d0}, {d1}]"
            )));
        }
        Ok(())
    }

    /// Maps a data value to pixels; `None` for non-finite input or a value the
    /// transform cannot represent.
    #[must_use]
    pub fn map(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let t = self.transform.forward(value)?;
        let t0 = self.transform.forward(self.domain.0)?;
        let t1 = self.transform.forward(self.domain.1)?;
        let span = t1 - t0;
        if span == 0.0 {
            return None;
        }
        let normalized = (t - t0) / span;
        let pixel = self.range.0 + normalized * (self.range.1 - self.range.0);
        pixel.is_finite().then_some(pixel)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> Option<f64> {
        if !pixel.is_finite() {
            return None;
        }
        let t0 = self.transform.forward(self.domain.0)?;
        let t1 = self.transform.forward(self.domain.1)?;
        let range_span = self.range.1 - self.range.0;
        if range_span == 0.0 {
            return None;
        }
        let normalized = (pixel - self.range.0) / range_span;
        let value = self.transform.inverse(t0 + normalized * (t1 - t0));
        value.is_finite().then_some(value)
    }

    /// Clone whose range reaches `padding_px` beyond both ends, with the domain
    /// extended so that in-domain values keep their pixel positions.
    #[must_use]
    pub fn padded(self, padding_px: f64) -> Self {
        let direction = if self.range.1 >= self.range.0 { 1.0 } else { -1.0 };
        let range = (
            self.range.0 - direction * padding_px,
            self.range.1 + direction * padding_px,
        );
        let domain = match (self.invert(range.0), self.invert(range.1)) {
            (Some(start), Some(end)) => (start, end),
            _ => self.domain,
        };
        Self {
            domain,
            range,
            transform: self.transform,
        }
    }

    /// Tick values inside the domain, ascending.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        match self.transform {
            ScaleTransform::Linear => linear_ticks(lo, hi, count),
            ScaleTransform::Log => log_ticks(lo, hi, count),
        }
    }

    /// Distance between neighbouring ticks, used for label precision.
    #[must_use]
    pub fn tick_step(self, count: usize) -> Option<f64> {
        let (lo, hi) = ordered(self.domain);
        match self.transform {
            ScaleTransform::Linear => tick_increment(lo, hi, count),
            ScaleTransform::Log => None,
        }
    }
}

/// Ordered categories placed at evenly spaced band centres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteScale {
    domain: IndexSet<String>,
    range: (f64, f64),
}

impl DiscreteScale {
    #[must_use]
    pub fn new<I, S>(categories: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domain: categories.into_iter().map(Into::into).collect(),
            range,
        }
    }

    #[must_use]
    pub fn domain(&self) -> &IndexSet<String> {
        &self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.domain.is_empty() {
            return Err(ChartError::Configuration(
                "discrete scale domain must not be empty".to_owned(),
            ));
        }
        let (r0, r1) = self.range;
        if !r0.is_finite() || !r1.is_finite() || r0 == r1 {
            return Err(ChartError::Configuration(format!(
                "scale range must be finite and non-degenerate, got [{r0}, {r1}]"
            )));
        }
        Ok(())
    }

    /// Signed pixel distance between neighbouring band centres.
    #[must_use]
    pub fn step(&self) -> f64 {
        if self.domain.is_empty() {
            return 0.0;
        }
        (self.range.1 - self.range.0) / self.domain.len() as f64
    }

    #[must_use]
    pub fn band_width(&self) -> f64 {
        self.step().abs()
    }

    #[must_use]
    pub fn map_key(&self, key: &str) -> Option<f64> {
        let index = self.domain.get_index_of(key)?;
        Some(self.range.0 + self.step() * (index as f64 + 0.5))
    }
}

/// Scale mapping used by positional aesthetics.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleMapping {
    Continuous(ContinuousScale),
    Discrete(DiscreteScale),
}

/// One labelled tick position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Stable reconciliation key derived from the data value.
    pub key: String,
    pub value: Value,
    pub position: f64,
    pub label: String,
}

/// Domain to pixel mapping with tick and hover formatting.
#[derive(Debug, Clone)]
pub struct Scale {
    mapping: ScaleMapping,
    tick_format: TickFormat,
    hover_format: Option<TickFormat>,
}

impl Scale {
    #[must_use]
    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::from_mapping(ScaleMapping::Continuous(ContinuousScale::new(
            domain,
            range,
            ScaleTransform::Linear,
        )))
    }

    #[must_use]
    pub fn log(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::from_mapping(ScaleMapping::Continuous(ContinuousScale::new(
            domain,
            range,
            ScaleTransform::Log,
        )))
    }

    #[must_use]
    pub fn discrete<I, S>(categories: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_mapping(ScaleMapping::Discrete(DiscreteScale::new(categories, range)))
    }

    #[must_use]
    pub fn from_mapping(mapping: ScaleMapping) -> Self {
        Self {
            mapping,
            tick_format: TickFormat::Auto,
            hover_format: None,
        }
    }

    #[must_use]
    pub fn with_tick_format(mut self, format: TickFormat) -> Self {
        self.tick_format = format;
        self
    }

    #[must_use]
    pub fn with_hover_format(mut self, format: TickFormat) -> Self {
        self.hover_format = Some(format);
        self
    }

    #[must_use]
    pub fn mapping(&self) -> &ScaleMapping {
        &self.mapping
    }

    #[must_use]
    pub fn scale_type(&self) -> ScaleType {
        match self.mapping {
            ScaleMapping::Continuous(_) => ScaleType::Continuous,
            ScaleMapping::Discrete(_) => ScaleType::Discrete,
        }
    }

    #[must_use]
    pub fn transform(&self) -> Option<ScaleTransform> {
        match &self.mapping {
            ScaleMapping::Continuous(scale) => Some(scale.transform()),
            ScaleMapping::Discrete(_) => None,
        }
    }

    #[must_use]
    pub fn as_continuous(&self) -> Option<ContinuousScale> {
        match &self.mapping {
            ScaleMapping::Continuous(scale) => Some(*scale),
            ScaleMapping::Discrete(_) => None,
        }
    }

    #[must_use]
    pub fn as_discrete(&self) -> Option<&DiscreteScale> {
        match &self.mapping {
            ScaleMapping::Continuous(_) => None,
            ScaleMapping::Discrete(scale) => Some(scale),
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match &self.mapping {
            ScaleMapping::Continuous(scale) => scale.range(),
            ScaleMapping::Discrete(scale) => scale.range(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        match &self.mapping {
            ScaleMapping::Continuous(scale) => scale.validate(),
            ScaleMapping::Discrete(scale) => scale.validate(),
        }
    }

    /// Projects a cell to pixels. `None` is the "no value" sentinel.
    #[must_use]
    pub fn map(&self, value: &Value) -> Option<f64> {
        match &self.mapping {
            ScaleMapping::Continuous(scale) => scale.map(value.as_number()?),
            ScaleMapping::Discrete(scale) => scale.map_key(&value.key()?),
        }
    }

    #[must_use]
    pub fn map_number(&self, value: f64) -> Option<f64> {
        self.map(&Value::Number(value))
    }

    /// Pixel back to data value; discrete scales are not invertible.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<f64> {
        self.as_continuous()?.invert(pixel)
    }

    /// Clone used by brushes: continuous ranges grow by `padding_px` on both
    /// ends with a matching domain; category positions are unchanged.
    #[must_use]
    pub fn padded(&self, padding_px: f64) -> Self {
        let mapping = match &self.mapping {
            ScaleMapping::Continuous(scale) => ScaleMapping::Continuous(scale.padded(padding_px)),
            ScaleMapping::Discrete(scale) => ScaleMapping::Discrete(scale.clone()),
        };
        Self {
            mapping,
            tick_format: self.tick_format.clone(),
            hover_format: self.hover_format.clone(),
        }
    }

    /// Pixel width of one category band, zero for continuous scales.
    #[must_use]
    pub fn band_width(&self) -> f64 {
        self.as_discrete().map_or(0.0, DiscreteScale::band_width)
    }

    /// Cosmetic offset of up to half a band around `position`.
    ///
    /// Continuous scales return `position` unchanged.
    pub fn jitter<R: Rng>(&self, position: f64, rng: &mut R) -> f64 {
        let half = self.band_width() * 0.5;
        if half <= 0.0 {
            return position;
        }
        position + rng.gen_range(-half..=half)
    }

    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        match &self.mapping {
            ScaleMapping::Continuous(scale) => {
                let step = scale.tick_step(count);
                scale
                    .ticks(count)
                    .into_iter()
                    .filter_map(|value| {
                        let position = scale.map(value)?;
                        Some(Tick {
                            key: tick_key(value),
                            value: Value::Number(value),
                            position,
                            label: self.tick_format.format_number(value, step),
                        })
                    })
                    .collect()
            }
            ScaleMapping::Discrete(scale) => scale
                .domain()
                .iter()
                .filter_map(|category| {
                    let position = scale.map_key(category)?;
                    Some(Tick {
                        key: category.clone(),
                        value: Value::Text(category.clone()),
                        position,
                        label: category.clone(),
                    })
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn format_hover(&self, value: &Value) -> String {
        self.hover_format
            .as_ref()
            .unwrap_or(&self.tick_format)
            .format_value(value)
    }
}

fn tick_key(value: f64) -> String {
    // Round away float noise so equal ticks across renders share a key.
    let rounded = (value * 1e9).round() / 1e9;
    Value::Number(rounded).key().unwrap_or_default()
}

fn ordered(domain: (f64, f64)) -> (f64, f64) {
    if domain.0 <= domain.1 {
        domain
    } else {
        (domain.1, domain.0)
    }
}

/// Step between "nice" ticks (1, 2 or 5 times a power of ten).
fn tick_increment(lo: f64, hi: f64, count: usize) -> Option<f64> {
    if count == 0 || !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return None;
    }
    let raw = (hi - lo) / count as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    Some(factor * base)
}

fn linear_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    let Some(step) = tick_increment(lo, hi, count) else {
        return Vec::new();
    };
    let start = (lo / step).ceil() as i64;
    let end = (hi / step).floor() as i64;
    (start..=end).map(|index| index as f64 * step).collect()
}

fn log_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if lo <= 0.0 || hi <= lo {
        return Vec::new();
    }
    let first = lo.log10().ceil() as i32;
    let last = hi.log10().floor() as i32;
    let powers: Vec<f64> = (first..=last).map(|exp| 10f64.powi(exp)).collect();
    if powers.len() >= 2 || count <= 2 {
        return powers;
    }

    let mut ticks = Vec::new();
    let low_exp = lo.log10().floor() as i32;
    let high_exp = hi.log10().ceil() as i32;
    for exp in low_exp..=high_exp {
        let base = 10f64.powi(exp);
        for multiple in [1.0, 2.0, 5.0] {
            let value = base * multiple;
            if value >= lo && value <= hi {
                ticks.push(value);
            }
        }
    }
    ticks
}
