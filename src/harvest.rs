//! Harvest: extract survivors, sort exactly, truncate to K
//!
//! The only comparison sort in the pipeline, applied to the small subset
//! that survived the selected threshold. Ordering is total and documented:
//! descending by value, ties broken by ascending row identity, so repeated
//! runs over the same immutable source return the identical result.

use crate::stats::comparable_value;
use crate::{Error, Result};
use arrow::array::{Array, Float64Array};
use rayon::prelude::*;

/// One ranked result element: a value and its stable row identity
///
/// `row` is the element's position in the logical column (for partitioned
/// sources: partition offset plus local row) and doubles as the tie-break
/// key for duplicate values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedValue {
    /// The column value
    pub value: f64,
    /// Stable global row identity, ascending tie-break for equal values
    pub row: u64,
}

/// Extract all comparable values strictly greater than `threshold`,
/// tagged with their global row identity
#[must_use]
pub(crate) fn collect_above(column: &Float64Array, threshold: f64, row_base: u64) -> Vec<RankedValue> {
    (0..column.len())
        .into_par_iter()
        .filter_map(|index| {
            comparable_value(column, index)
                .filter(|&value| value > threshold)
                .map(|value| RankedValue {
                    value,
                    row: row_base + index as u64,
                })
        })
        .collect()
}

/// Extract every comparable value, for the exhaustive path
#[must_use]
pub(crate) fn collect_all(column: &Float64Array, row_base: u64) -> Vec<RankedValue> {
    (0..column.len())
        .into_par_iter()
        .filter_map(|index| {
            comparable_value(column, index).map(|value| RankedValue {
                value,
                row: row_base + index as u64,
            })
        })
        .collect()
}

/// Exact descending sort with the ascending-row tie-break
pub(crate) fn sort_survivors(survivors: &mut [RankedValue]) {
    survivors.sort_unstable_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.row.cmp(&b.row))
    });
}

/// Sort the surviving subset and truncate it to exactly `k`
///
/// # Errors
/// Returns [`Error::HarvestShortfall`] if fewer than `k` values survived:
/// the selected threshold promised at least `k`, so a shortfall means the
/// selector and the harvest disagree about the data.
pub(crate) fn finish(
    mut survivors: Vec<RankedValue>,
    threshold: f64,
    k: usize,
) -> Result<Vec<RankedValue>> {
    if survivors.len() < k {
        return Err(Error::HarvestShortfall {
            expected: k,
            found: survivors.len(),
            threshold,
        });
    }
    sort_survivors(&mut survivors);
    survivors.truncate(k);
    Ok(survivors)
}

/// Harvest the top `k` values of a column above a selected threshold
///
/// # Errors
/// Returns [`Error::HarvestShortfall`] if fewer than `k` values exceed the
/// threshold.
pub fn harvest(column: &Float64Array, threshold: f64, k: usize) -> Result<Vec<RankedValue>> {
    finish(collect_above(column, threshold, 0), threshold, k)
}
