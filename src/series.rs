//! Candidate threshold series generation
//!
//! Given the value range and an initial estimate, produce the ordered
//! sequence of cutoffs the evaluator will price. Every series is strictly
//! decreasing and strictly above `min`: a threshold at or below `min` would
//! admit the entire column, which is never worth an evaluation pass.

use serde::{Deserialize, Serialize};

/// Fractions of the value range below `max` probed by the parallel batch
const RANGE_FRACTIONS: [f64; 5] = [0.125, 0.25, 0.5, 0.75, 0.875];

/// Fallback gap divisor when the estimate leaves no usable gap below `max`
const SEED_GAP_DIVISOR: f64 = 1024.0;

/// Candidate series policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeriesPolicy {
    /// Doubling-from-max: walk downward from the estimate, doubling the
    /// distance to `max` each step
    ///
    /// Termination is O(log(range / initial gap)) regardless of the data's
    /// shape, but each step depends on the previous one, so the chain costs
    /// one full scan per step when driven sequentially.
    Doubling,
    /// A fixed batch of range fractions plus the estimate, priced in one
    /// concurrent round
    ///
    /// Trades estimation precision for full parallel independence: several
    /// concurrent scans cost barely more wall-clock than one. Default for
    /// in-memory execution.
    #[default]
    FixedFraction,
}

/// One step of the doubling recurrence: double the distance from `max`
///
/// Kept as a stateless pure function (rather than a loop-carried variable)
/// so the step is unit-testable in isolation and the policy can be swapped
/// without touching the rest of the pipeline.
#[must_use]
pub fn widen(max: f64, current: f64) -> f64 {
    2.0f64.mul_add(-(max - current), max)
}

/// Generate the candidate threshold series for a value range and estimate
///
/// The result is strictly decreasing with every element in `(min, max)`.
/// Callers guarantee `min < max`; degenerate ranges never reach the
/// generator.
#[must_use]
pub fn generate_series(min: f64, max: f64, estimate: f64, policy: SeriesPolicy) -> Vec<f64> {
    debug_assert!(min < max);
    match policy {
        SeriesPolicy::Doubling => doubling_series(min, max, estimate),
        SeriesPolicy::FixedFraction => fixed_fraction_series(min, max, estimate),
    }
}

fn doubling_series(min: f64, max: f64, estimate: f64) -> Vec<f64> {
    let mut current = if estimate > min && estimate < max {
        estimate
    } else {
        // No usable starting gap; seed one small enough that the doubling
        // chain still covers the whole range in ~10 steps
        max - (max - min) / SEED_GAP_DIVISOR
    };

    let mut series = Vec::new();
    while current > min {
        series.push(current);
        let next = widen(max, current);
        if next >= current {
            // Gap below one ulp of max: the recurrence can no longer make
            // progress toward min
            break;
        }
        current = next;
    }
    series
}

fn fixed_fraction_series(min: f64, max: f64, estimate: f64) -> Vec<f64> {
    let range = max - min;
    let mut series: Vec<f64> = RANGE_FRACTIONS
        .iter()
        .map(|fraction| range.mul_add(-fraction, max))
        .collect();
    series.push(estimate);
    series.retain(|&threshold| threshold > min && threshold < max);
    series.sort_unstable_by(|a, b| b.total_cmp(a));
    series.dedup();
    series
}
