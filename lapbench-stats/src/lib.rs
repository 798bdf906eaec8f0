#![warn(missing_docs)]
//! Lapbench Stats - Online Summary Statistics
//!
//! A sampling loop may complete tens of thousands of iterations inside one
//! time budget; storing every duration just to report a handful of summary
//! numbers would be wasted memory. [`OnlineStats`] keeps running moments
//! instead (Welford's online algorithm) in O(1) space and derives the
//! reported figures on demand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// z-score of the 95th percentile of the standard normal distribution.
const P95_Z: f64 = 1.96;

/// Errors from accessors called with too few samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The accessor needs more samples than have been pushed so far.
    #[error("not enough samples: got {got}, need at least {min}")]
    InsufficientData {
        /// Samples pushed so far.
        got: u64,
        /// Samples the accessor requires.
        min: u64,
    },
}

/// Constant-space accumulator of count/mean/variance/min/max over a stream
/// of `f64` samples.
///
/// Raw samples are never stored. The second moment is maintained with
/// Welford's update, so one pass over the stream stays numerically stable
/// even for very long runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineStats {
    count: u64,
    sum: f64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl OnlineStats {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample into the running moments. O(1) time and space.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);

        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    /// Number of samples pushed so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether enough samples exist for the variance family of accessors.
    pub fn is_ok(&self) -> bool {
        self.count > 1
    }

    /// Smallest sample seen, if any were pushed.
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// Largest sample seen, if any were pushed.
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Arithmetic mean. Errors on an empty accumulator.
    pub fn mean(&self) -> Result<f64, StatsError> {
        self.require(1)?;
        Ok(self.sum / self.count as f64)
    }

    /// Population variance (`m2 / n`). Requires at least two samples.
    pub fn variance(&self) -> Result<f64, StatsError> {
        self.require(2)?;
        Ok(self.m2 / self.count as f64)
    }

    /// Bessel-corrected sample variance (`m2 / (n - 1)`).
    pub fn sample_variance(&self) -> Result<f64, StatsError> {
        self.require(2)?;
        Ok(self.m2 / (self.count - 1) as f64)
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> Result<f64, StatsError> {
        Ok(self.variance()?.sqrt())
    }

    /// Sample standard deviation.
    pub fn sample_std_dev(&self) -> Result<f64, StatsError> {
        Ok(self.sample_variance()?.sqrt())
    }

    /// Approximate 95th percentile: `mean + 1.96 * sample_std_dev`.
    ///
    /// A normal-approximation estimate, not an order statistic. Adequate
    /// for the harness's summary table; callers needing real percentiles
    /// must keep their own samples.
    pub fn p95(&self) -> Result<f64, StatsError> {
        Ok(self.mean()? + P95_Z * self.sample_std_dev()?)
    }

    fn require(&self, min: u64) -> Result<(), StatsError> {
        if self.count < min {
            return Err(StatsError::InsufficientData {
                got: self.count,
                min,
            });
        }
        Ok(())
    }
}
