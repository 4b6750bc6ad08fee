//! Convergence selection
//!
//! Given priced candidates, pick the tightest threshold whose population
//! still covers the target count. More survivors than K is acceptable (the
//! exact sort absorbs the slack); fewer is not.

use crate::evaluate::Candidate;
use crate::{Error, Result};

/// Select the tightest satisfying threshold from a priced candidate batch
///
/// Among candidates with `population >= k`, the one with the smallest
/// population wins, minimizing the harvest-and-sort cost downstream.
///
/// # Errors
/// Returns [`Error::SeriesExhausted`] when no candidate covers `k`; the
/// error carries the best population seen so the caller can tell a near
/// miss from a hopeless series.
pub fn select_threshold(candidates: &[Candidate], k: usize) -> Result<f64> {
    let mut chosen: Option<&Candidate> = None;
    let mut best = 0;

    for candidate in candidates {
        best = best.max(candidate.population);
        if candidate.population < k {
            continue;
        }
        match chosen {
            Some(current) if current.population <= candidate.population => {}
            _ => chosen = Some(candidate),
        }
    }

    chosen
        .map(|candidate| candidate.threshold)
        .ok_or(Error::SeriesExhausted { k, best })
}
