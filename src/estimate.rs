//! Distribution-aware initial threshold estimation
//!
//! A pure function from collected statistics and a target count to a first
//! cutoff guess. The hypothesis is a policy knob, not a correctness
//! requirement: a wrong hypothesis only costs extra convergence rounds.

use crate::quantile::normal_quantile;
use crate::stats::ColumnStats;
use serde::{Deserialize, Serialize};

/// Distribution hypothesis for the initial threshold estimate
///
/// Represented as a tagged variant rather than a trait hierarchy so the
/// estimator stays orthogonal to the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hypothesis {
    /// Linear interpolation across the value range
    ///
    /// Exact for uniformly distributed data; elsewhere it degrades into a
    /// usable convergence starting point.
    Uniform,
    /// Normal right-tail estimate from mean and standard deviation
    ///
    /// Default: real-world numeric measurements tend to resemble a normal
    /// right tail more than a flat one.
    #[default]
    Normal,
}

/// Estimate an initial threshold above which roughly `k` of the `stats.count`
/// values should lie
///
/// The normal estimate falls back to the uniform one whenever it is unusable
/// as a starting point: zero spread, a non-finite value, or a position
/// outside the open value range.
#[must_use]
pub fn initial_threshold(stats: &ColumnStats, k: usize, hypothesis: Hypothesis) -> f64 {
    match hypothesis {
        Hypothesis::Uniform => uniform_estimate(stats, k),
        Hypothesis::Normal => {
            let stddev = stats.stddev();
            let estimate = stddev.mul_add(normal_quantile(1.0 - fraction(stats, k)), stats.mean());
            if stddev > 0.0 && estimate.is_finite() && estimate > stats.min && estimate < stats.max
            {
                estimate
            } else {
                uniform_estimate(stats, k)
            }
        }
    }
}

/// `min + (max - min) * (1 - k/count)`
///
/// Strictly inside `(min, max)` whenever `0 < k < count` and the range is
/// non-degenerate.
fn uniform_estimate(stats: &ColumnStats, k: usize) -> f64 {
    stats.range().mul_add(1.0 - fraction(stats, k), stats.min)
}

#[allow(clippy::cast_precision_loss)]
fn fraction(stats: &ColumnStats, k: usize) -> f64 {
    k as f64 / stats.count as f64
}
