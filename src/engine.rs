//! Threshold-search engine
//!
//! Wires the pipeline: collect statistics, estimate an initial cutoff,
//! generate candidate thresholds, price their populations, select the
//! tightest satisfying threshold, then harvest and exact-sort only the
//! survivors. The partitioned adapter runs the identical pipeline; only the
//! scan primitives differ.
//!
//! **Scan budget** (fixed-fraction policy): one statistics pass, one
//! concurrent candidate batch, one harvest pass over the column regardless
//! of its size, against a full sort's O(N log N) comparisons.

use crate::estimate::{initial_threshold, Hypothesis};
use crate::evaluate::evaluate_candidates;
use crate::harvest::{self, RankedValue};
use crate::partition::{Partition, PartitionSet};
use crate::select::select_threshold;
use crate::series::{generate_series, SeriesPolicy};
use crate::stats::{collect_stats, ColumnStats};
use crate::{Error, Result};
use arrow::array::Float64Array;
use tracing::{debug, trace};

/// Scan primitives the pipeline needs from a source of values
///
/// Implemented for in-memory columns and partition sets; everything above
/// this seam is storage-agnostic.
trait Source {
    fn source_stats(&self) -> Result<ColumnStats>;
    fn population_above(&self, threshold: f64) -> usize;
    fn gather_above(&self, threshold: f64) -> Vec<RankedValue>;
    fn gather_all(&self) -> Vec<RankedValue>;
}

impl Source for Float64Array {
    fn source_stats(&self) -> Result<ColumnStats> {
        collect_stats(self)
    }

    fn population_above(&self, threshold: f64) -> usize {
        crate::evaluate::count_above(self, threshold)
    }

    fn gather_above(&self, threshold: f64) -> Vec<RankedValue> {
        harvest::collect_above(self, threshold, 0)
    }

    fn gather_all(&self) -> Vec<RankedValue> {
        harvest::collect_all(self, 0)
    }
}

impl<P: Partition> Source for PartitionSet<P> {
    fn source_stats(&self) -> Result<ColumnStats> {
        self.merged_stats()
    }

    fn population_above(&self, threshold: f64) -> usize {
        self.count_above(threshold)
    }

    fn gather_above(&self, threshold: f64) -> Vec<RankedValue> {
        self.survivors_above(threshold)
    }

    fn gather_all(&self) -> Vec<RankedValue> {
        self.all_survivors()
    }
}

/// Configured threshold-search top-K engine
///
/// Cheap to construct and reusable across queries; holds only the two policy
/// knobs. See [`Hypothesis`] and [`SeriesPolicy`] for the trade-offs.
///
/// # Example
/// ```
/// use arrow::array::Float64Array;
/// use cumbre::{Hypothesis, SeriesPolicy, ThresholdTopK};
///
/// # fn main() -> cumbre::Result<()> {
/// let column = Float64Array::from(vec![3.0, 9.5, 1.2, 7.7, 4.4]);
/// let engine = ThresholdTopK::builder()
///     .hypothesis(Hypothesis::Normal)
///     .series(SeriesPolicy::FixedFraction)
///     .build();
///
/// let top2 = engine.select(&column, 2)?;
/// assert_eq!(top2[0].value, 9.5);
/// assert_eq!(top2[1].value, 7.7);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdTopK {
    hypothesis: Hypothesis,
    series: SeriesPolicy,
}

impl ThresholdTopK {
    /// Create an engine with the default policies (normal hypothesis,
    /// fixed-fraction series)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine builder
    #[must_use]
    pub fn builder() -> ThresholdTopKBuilder {
        ThresholdTopKBuilder::default()
    }

    /// The configured distribution hypothesis
    #[must_use]
    pub const fn hypothesis(&self) -> Hypothesis {
        self.hypothesis
    }

    /// The configured candidate series policy
    #[must_use]
    pub const fn series(&self) -> SeriesPolicy {
        self.series
    }

    /// Select the `k` largest values of an in-memory column
    ///
    /// Returns exactly `k` elements, descending by value, ties broken by
    /// ascending row index.
    ///
    /// # Errors
    /// - [`Error::InvalidInput`] if `k` is zero
    /// - [`Error::EmptySource`] if the column holds no comparable value
    /// - [`Error::UnsatisfiableK`] if `k` exceeds the comparable-value count
    /// - [`Error::HarvestShortfall`] on selector/harvest disagreement
    ///   (internal invariant violation)
    pub fn select(&self, column: &Float64Array, k: usize) -> Result<Vec<RankedValue>> {
        self.run(column, k)
    }

    /// Select the `k` largest values across a partition set
    ///
    /// Identical pipeline and guarantees as [`select`](Self::select); row
    /// identities are globalized through the set's partition offsets, so the
    /// result matches a flat concatenation of the partitions.
    ///
    /// # Errors
    /// Same contract as [`select`](Self::select).
    pub fn select_partitioned<P: Partition>(
        &self,
        partitions: &PartitionSet<P>,
        k: usize,
    ) -> Result<Vec<RankedValue>> {
        self.run(partitions, k)
    }

    fn run<S: Source + Sync>(&self, source: &S, k: usize) -> Result<Vec<RankedValue>> {
        if k == 0 {
            return Err(Error::InvalidInput("k must be greater than 0".to_string()));
        }

        let stats = source.source_stats()?;
        if k > stats.count {
            return Err(Error::UnsatisfiableK {
                k,
                count: stats.count,
            });
        }

        // Threshold arithmetic needs a usable range: a full-column request,
        // a constant column, or an infinite endpoint all go straight to the
        // exact sort over every comparable value.
        if k == stats.count || stats.range() == 0.0 || !stats.range().is_finite() {
            debug!(k, count = stats.count, "exhaustive selection path");
            return harvest::finish(source.gather_all(), f64::NEG_INFINITY, k);
        }

        let estimate = initial_threshold(&stats, k, self.hypothesis);
        debug!(
            k,
            count = stats.count,
            estimate,
            hypothesis = ?self.hypothesis,
            "initial threshold estimate"
        );

        let series = generate_series(stats.min, stats.max, estimate, self.series);
        let chosen = match self.series {
            SeriesPolicy::Doubling => converge_sequential(source, &series, k),
            SeriesPolicy::FixedFraction => {
                let candidates =
                    evaluate_candidates(&series, |threshold| source.population_above(threshold));
                select_threshold(&candidates, k)
            }
        };

        match chosen {
            Ok(threshold) => {
                debug!(threshold, "converged");
                harvest::finish(source.gather_above(threshold), threshold, k)
            }
            // Heavy duplication of the minimum can leave every above-min
            // threshold short of k; the full column always satisfies it.
            Err(Error::SeriesExhausted { .. }) => {
                debug!(k, "candidate series exhausted; selecting exhaustively");
                harvest::finish(source.gather_all(), f64::NEG_INFINITY, k)
            }
            Err(other) => Err(other),
        }
    }
}

/// Walk the doubling chain outward from the estimate, accepting the first
/// candidate that covers `k` without pricing the rest
fn converge_sequential<S: Source>(source: &S, series: &[f64], k: usize) -> Result<f64> {
    let mut best = 0;
    for &threshold in series {
        let population = source.population_above(threshold);
        trace!(threshold, population, "doubling probe");
        if population >= k {
            return Ok(threshold);
        }
        best = best.max(population);
    }
    Err(Error::SeriesExhausted { k, best })
}

/// Builder for [`ThresholdTopK`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdTopKBuilder {
    hypothesis: Hypothesis,
    series: SeriesPolicy,
}

impl ThresholdTopKBuilder {
    /// Set the distribution hypothesis
    #[must_use]
    pub const fn hypothesis(mut self, hypothesis: Hypothesis) -> Self {
        self.hypothesis = hypothesis;
        self
    }

    /// Set the candidate series policy
    #[must_use]
    pub const fn series(mut self, series: SeriesPolicy) -> Self {
        self.series = series;
        self
    }

    /// Build the engine
    #[must_use]
    pub const fn build(self) -> ThresholdTopK {
        ThresholdTopK {
            hypothesis: self.hypothesis,
            series: self.series,
        }
    }
}
