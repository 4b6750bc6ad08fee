//! Candidate population evaluation
//!
//! A candidate's population is the number of comparable values strictly
//! greater than its threshold. Evaluations for distinct candidates depend
//! only on the read-only (source, threshold) pair, so a batch prices every
//! candidate concurrently with nothing but a join barrier at the end.

use crate::stats::comparable_value;
use arrow::array::{Array, Float64Array};
use rayon::prelude::*;

/// A candidate cutoff paired with its evaluated population
///
/// Candidates are generated, priced, and discarded within one query; they
/// carry no identity beyond the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The cutoff value
    pub threshold: f64,
    /// Number of comparable values strictly greater than `threshold`
    pub population: usize,
}

/// Count comparable values strictly greater than `threshold`
///
/// Chunked rayon scan; null and NaN slots never count.
#[must_use]
pub fn count_above(column: &Float64Array, threshold: f64) -> usize {
    (0..column.len())
        .into_par_iter()
        .filter(|&index| {
            comparable_value(column, index).is_some_and(|value| value > threshold)
        })
        .count()
}

/// Price a batch of candidate thresholds concurrently
///
/// `population_of` is the counting closure over whatever source backs the
/// query (an in-memory column or a partition fan-out), capturing its
/// read-only inputs explicitly instead of sharing scope. Results keep the
/// input order.
pub fn evaluate_candidates<F>(thresholds: &[f64], population_of: F) -> Vec<Candidate>
where
    F: Fn(f64) -> usize + Sync,
{
    thresholds
        .par_iter()
        .map(|&threshold| Candidate {
            threshold,
            population: population_of(threshold),
        })
        .collect()
}
