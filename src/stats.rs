//! Single-pass column statistics
//!
//! One linear scan produces everything the threshold estimator needs:
//! {min, max, count, sum, sum of squares}. The reduction is chunked and
//! embarrassingly parallel; partial results combine with an associative,
//! commutative merge, so the same [`ColumnStats`] type also serves as the
//! per-partition unit the partitioned adapter folds together.
//!
//! NaN values and Arrow nulls are both treated as missing: they contribute
//! to neither the statistics nor any later population count.

use crate::{Error, Result};
use arrow::array::{Array, Float64Array};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Single-pass statistics over the comparable values of a column
///
/// `count` tracks comparable (non-null, non-NaN) values only. `sum` and
/// `sum_sq` reconstruct mean and variance without a second scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Smallest comparable value
    pub min: f64,
    /// Largest comparable value
    pub max: f64,
    /// Number of comparable values
    pub count: usize,
    /// Sum of comparable values
    pub sum: f64,
    /// Sum of squared comparable values
    pub sum_sq: f64,
}

impl ColumnStats {
    /// Identity element for [`merge`](Self::merge)
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        count: 0,
        sum: 0.0,
        sum_sq: 0.0,
    };

    /// Fold one value into the statistics
    #[must_use]
    pub fn observe(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
            count: self.count + 1,
            sum: self.sum + value,
            sum_sq: value.mul_add(value, self.sum_sq),
        }
    }

    /// Combine two partial statistics
    ///
    /// Associative and commutative, with [`EMPTY`](Self::EMPTY) as identity,
    /// so chunked reductions and per-partition combines are order-free.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            count: self.count + other.count,
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
        }
    }

    /// Arithmetic mean of the comparable values
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// Population variance, reconstructed from `sum` and `sum_sq`
    ///
    /// Clamped at zero: catastrophic cancellation on near-constant columns
    /// can push the raw expression slightly negative.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0)
    }

    /// Population standard deviation
    #[must_use]
    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Width of the value range
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// The comparable value at `index`, or `None` for null and NaN slots
#[inline]
pub(crate) fn comparable_value(column: &Float64Array, index: usize) -> Option<f64> {
    if column.is_null(index) {
        return None;
    }
    let value = column.value(index);
    (!value.is_nan()).then_some(value)
}

/// Collect single-pass statistics over a column
///
/// Chunked rayon reduction: per-chunk partials merge associatively, so
/// worker completion order is irrelevant.
///
/// # Errors
/// Returns [`Error::EmptySource`] if the column holds no comparable value.
pub fn collect_stats(column: &Float64Array) -> Result<ColumnStats> {
    let stats = (0..column.len())
        .into_par_iter()
        .fold(
            || ColumnStats::EMPTY,
            |acc, index| match comparable_value(column, index) {
                Some(value) => acc.observe(value),
                None => acc,
            },
        )
        .reduce(|| ColumnStats::EMPTY, ColumnStats::merge);

    if stats.count == 0 {
        return Err(Error::EmptySource);
    }
    debug_assert!(stats.min <= stats.max);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_stats_basic() {
        let column = Float64Array::from(vec![3.0, 1.0, 4.0, 1.5]);
        let stats = collect_stats(&column).unwrap();

        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.count, 4);
        assert!((stats.sum - 9.5).abs() < 1e-12);
        assert!((stats.sum_sq - (9.0 + 1.0 + 16.0 + 2.25)).abs() < 1e-12);
    }

    #[test]
    fn test_collect_stats_skips_nulls_and_nans() {
        let column = Float64Array::from(vec![
            Some(2.0),
            None,
            Some(f64::NAN),
            Some(8.0),
        ]);
        let stats = collect_stats(&column).unwrap();

        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 8.0);
        assert!((stats.sum - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_collect_stats_empty_source() {
        let empty = Float64Array::from(Vec::<f64>::new());
        assert!(matches!(collect_stats(&empty), Err(Error::EmptySource)));

        let all_missing = Float64Array::from(vec![None, Some(f64::NAN)]);
        assert!(matches!(
            collect_stats(&all_missing),
            Err(Error::EmptySource)
        ));
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let left = Float64Array::from(vec![1.0, 9.0]);
        let right = Float64Array::from(vec![5.0, -2.0, 3.0]);
        let whole = Float64Array::from(vec![1.0, 9.0, 5.0, -2.0, 3.0]);

        let merged = collect_stats(&left)
            .unwrap()
            .merge(collect_stats(&right).unwrap());
        let single = collect_stats(&whole).unwrap();

        assert_eq!(merged.count, single.count);
        assert_eq!(merged.min, single.min);
        assert_eq!(merged.max, single.max);
        assert!((merged.sum - single.sum).abs() < 1e-12);
        assert!((merged.sum_sq - single.sum_sq).abs() < 1e-12);
    }

    #[test]
    fn test_merge_identity() {
        let stats = collect_stats(&Float64Array::from(vec![4.0, 7.0])).unwrap();
        let merged = stats.merge(ColumnStats::EMPTY);

        assert_eq!(merged, stats);
        assert_eq!(ColumnStats::EMPTY.merge(stats), stats);
    }

    #[test]
    fn test_derived_moments() {
        // Values 2, 4, 6: mean 4, population variance 8/3
        let stats = collect_stats(&Float64Array::from(vec![2.0, 4.0, 6.0])).unwrap();

        assert!((stats.mean() - 4.0).abs() < 1e-12);
        assert!((stats.variance() - 8.0 / 3.0).abs() < 1e-12);
        assert!((stats.stddev() - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.range(), 4.0);
    }

    #[test]
    fn test_variance_clamped_on_constant_column() {
        let stats = collect_stats(&Float64Array::from(vec![1e8 + 0.1; 1000])).unwrap();
        assert!(stats.variance() >= 0.0);
    }
}
