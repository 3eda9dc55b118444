use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Multiplier applied to the IQR to place the outlier fences.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Order statistics of one box-plot group.
///
/// Recomputed on every render; never cached across data changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuartileSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub sorted_values: Vec<f64>,
}

impl QuartileSummary {
    /// Builds the summary from raw samples; non-finite samples are dropped.
    ///
    /// Returns `None` when no finite sample remains.
    #[must_use]
    pub fn from_samples(samples: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.into_iter().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by_key(|value| OrderedFloat(*value));

        let median = median_of_sorted(&sorted)?;
        let half = sorted.len() / 2;
        // Odd-length groups leave the median out of both halves.
        let (lower, upper) = if sorted.len() % 2 == 0 {
            (&sorted[..half], &sorted[half..])
        } else {
            (&sorted[..half], &sorted[half + 1..])
        };
        let q1 = median_of_sorted(lower).unwrap_or(median);
        let q3 = median_of_sorted(upper).unwrap_or(median);

        Some(Self {
            q1,
            median,
            q3,
            iqr: q3 - q1,
            sorted_values: sorted,
        })
    }

    #[must_use]
    pub fn lower_fence(&self) -> f64 {
        self.q1 - WHISKER_IQR_FACTOR * self.iqr
    }

    #[must_use]
    pub fn upper_fence(&self) -> f64 {
        self.q3 + WHISKER_IQR_FACTOR * self.iqr
    }

    /// Largest in-fence sample above Q3; `None` suppresses the top whisker.
    #[must_use]
    pub fn upper_whisker(&self) -> Option<f64> {
        let fence = self.upper_fence();
        self.sorted_values
            .iter()
            .rev()
            .copied()
            .find(|value| *value <= fence)
            .filter(|value| *value > self.q3)
    }

    /// Smallest in-fence sample below Q1; `None` suppresses the bottom whisker.
    #[must_use]
    pub fn lower_whisker(&self) -> Option<f64> {
        let fence = self.lower_fence();
        self.sorted_values
            .iter()
            .copied()
            .find(|value| *value >= fence)
            .filter(|value| *value < self.q1)
    }

    #[must_use]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_fence() || value > self.upper_fence()
    }

    pub fn outliers(&self) -> impl Iterator<Item = f64> + '_ {
        self.sorted_values
            .iter()
            .copied()
            .filter(|value| self.is_outlier(*value))
    }
}

/// Median of an ascending slice: middle element, or mean of the two middles.
#[must_use]
pub fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
