//! Student-t confidence intervals on a sample mean.
//!
//! For a sample of `n > 1` values the two-sided interval at level `c` is
//!
//! ```text
//! mean ± t((1 + c) / 2, n - 1) · s / √n
//! ```
//!
//! where `s` is the unbiased (n - 1) sample standard deviation. Samples too
//! small for an interval yield `None` bounds rather than NaN.

use crate::error::PrepError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF as _, StudentsT};

/// Confidence level in the open interval (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    pub const DEFAULT: Self = Self(0.95);

    /// # Errors
    ///
    /// Returns [`PrepError::InvalidConfidenceLevel`] unless `0 < level < 1`.
    pub fn new(level: f64) -> Result<Self, PrepError> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(PrepError::InvalidConfidenceLevel(level))
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Stable hashable identity, used as a cache key component.
    pub const fn to_bits(self) -> u64 {
        self.0.to_bits()
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = PrepError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.0
    }
}

impl std::str::FromStr for ConfidenceLevel {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = s
            .trim()
            .parse::<f64>()
            .map_err(|e| PrepError::Config(format!("invalid confidence level '{s}': {e}")))?;
        Self::new(level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// `None` for an empty sample.
    pub mean: Option<f64>,
    /// `None` when `sample_size < 2`.
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub sample_size: usize,
}

impl ConfidenceInterval {
    pub fn is_defined(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    pub fn half_width(&self) -> Option<f64> {
        Some((self.upper? - self.lower?) / 2.0)
    }
}

/// Arithmetic mean, summed in ascending order so the result does not depend
/// on the order of `values`.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(ordered_sum(values.iter().copied()) / values.len() as f64)
    }
}

/// Unbiased sample standard deviation; `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss = ordered_sum(values.iter().map(|v| (v - m).powi(2)));
    Some((ss / (values.len() - 1) as f64).sqrt())
}

fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);
    sorted.iter().sum()
}

/// Two-sided Student-t interval for the mean of `values`.
pub fn confidence_interval(values: &[f64], level: ConfidenceLevel) -> ConfidenceInterval {
    let n = values.len();
    let mean = mean(values);

    let bounds = match (mean, sample_std_dev(values)) {
        (Some(m), Some(s)) => t_quantile((1.0 + level.value()) / 2.0, (n - 1) as f64).map(|t| {
            let margin = t * s / (n as f64).sqrt();
            (m - margin, m + margin)
        }),
        _ => None,
    };

    ConfidenceInterval {
        mean,
        lower: bounds.map(|(lo, _)| lo),
        upper: bounds.map(|(_, hi)| hi),
        sample_size: n,
    }
}

fn t_quantile(p: f64, degrees_of_freedom: f64) -> Option<f64> {
    StudentsT::new(0.0, 1.0, degrees_of_freedom)
        .ok()
        .map(|dist| dist.inverse_cdf(p))
        .filter(|t| t.is_finite())
}
