//! Partitioned sources
//!
//! The storage collaborator owns the partitions; the engine only needs three
//! per-partition operations (statistics, population count, survivor
//! extraction) plus a stable translation from partition-local rows to global
//! row identities. Every combine step is associative and commutative, so the
//! fan-out over partitions is a barrier-join with no ordering requirements.

use crate::harvest::RankedValue;
use crate::stats::{comparable_value, ColumnStats};
use crate::{Error, Result};
use arrow::array::{Array, Float64Array};
use rayon::prelude::*;

/// A disjoint, independently stored slice of the logical column
///
/// Implementations are owned by the storage layer; the engine treats them as
/// opaque handles. `num_rows` counts physical slots (nulls included) so that
/// global row identities line up with the flat concatenation of the
/// partitions.
pub trait Partition: Sync {
    /// Physical row count, including null slots
    fn num_rows(&self) -> usize;

    /// Single-pass statistics over this partition's comparable values
    ///
    /// An empty partition returns [`ColumnStats::EMPTY`]; emptiness is
    /// decided once, on the merged result.
    fn stats(&self) -> ColumnStats;

    /// Number of comparable values strictly greater than `threshold`
    fn count_above(&self, threshold: f64) -> usize;

    /// All comparable values strictly greater than `threshold`, each paired
    /// with its partition-local row index
    fn elements_above(&self, threshold: f64) -> Vec<(f64, u64)>;

    /// Every comparable value with its partition-local row index, for the
    /// exhaustive path
    fn elements_all(&self) -> Vec<(f64, u64)>;
}

/// A set of partitions plus the offsets that globalize local row identities
///
/// `offsets[i]` is the number of physical rows in partitions `0..i`; a local
/// row `r` in partition `i` has global identity `offsets[i] + r`.
pub struct PartitionSet<P> {
    partitions: Vec<P>,
    offsets: Vec<u64>,
}

impl<P: Partition> PartitionSet<P> {
    /// Build a partition set, computing cumulative row offsets
    #[must_use]
    pub fn new(partitions: Vec<P>) -> Self {
        let mut offsets = Vec::with_capacity(partitions.len());
        let mut total: u64 = 0;
        for partition in &partitions {
            offsets.push(total);
            total += partition.num_rows() as u64;
        }
        Self { partitions, offsets }
    }

    /// Number of partitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Whether the set holds no partitions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// The partitions themselves
    #[must_use]
    pub fn partitions(&self) -> &[P] {
        &self.partitions
    }

    /// Merge per-partition statistics into global statistics
    ///
    /// # Errors
    /// Returns [`Error::EmptySource`] if no partition holds a comparable
    /// value.
    pub fn merged_stats(&self) -> Result<ColumnStats> {
        let stats = self
            .partitions
            .par_iter()
            .map(Partition::stats)
            .reduce(|| ColumnStats::EMPTY, ColumnStats::merge);

        if stats.count == 0 {
            return Err(Error::EmptySource);
        }
        Ok(stats)
    }

    /// Sum per-partition populations for one threshold
    #[must_use]
    pub fn count_above(&self, threshold: f64) -> usize {
        self.partitions
            .par_iter()
            .map(|partition| partition.count_above(threshold))
            .sum()
    }

    /// Gather survivors across partitions with globalized row identities
    #[must_use]
    pub fn survivors_above(&self, threshold: f64) -> Vec<RankedValue> {
        self.partitions
            .par_iter()
            .zip(self.offsets.par_iter())
            .flat_map(|(partition, &offset)| {
                partition
                    .elements_above(threshold)
                    .into_par_iter()
                    .map(move |(value, local)| RankedValue {
                        value,
                        row: offset + local,
                    })
            })
            .collect()
    }

    /// Gather every comparable value across partitions, for the exhaustive
    /// path
    #[must_use]
    pub fn all_survivors(&self) -> Vec<RankedValue> {
        self.partitions
            .par_iter()
            .zip(self.offsets.par_iter())
            .flat_map(|(partition, &offset)| {
                partition
                    .elements_all()
                    .into_par_iter()
                    .map(move |(value, local)| RankedValue {
                        value,
                        row: offset + local,
                    })
            })
            .collect()
    }
}

/// In-memory reference partition backed by an Arrow column
pub struct ArrayPartition {
    values: Float64Array,
}

impl ArrayPartition {
    /// Wrap a column as a partition
    #[must_use]
    pub fn new(values: Float64Array) -> Self {
        Self { values }
    }

    /// The underlying column
    #[must_use]
    pub fn values(&self) -> &Float64Array {
        &self.values
    }
}

impl From<Float64Array> for ArrayPartition {
    fn from(values: Float64Array) -> Self {
        Self::new(values)
    }
}

impl Partition for ArrayPartition {
    fn num_rows(&self) -> usize {
        self.values.len()
    }

    fn stats(&self) -> ColumnStats {
        (0..self.values.len()).fold(ColumnStats::EMPTY, |acc, index| {
            match comparable_value(&self.values, index) {
                Some(value) => acc.observe(value),
                None => acc,
            }
        })
    }

    fn count_above(&self, threshold: f64) -> usize {
        crate::evaluate::count_above(&self.values, threshold)
    }

    fn elements_above(&self, threshold: f64) -> Vec<(f64, u64)> {
        (0..self.values.len())
            .filter_map(|index| {
                comparable_value(&self.values, index)
                    .filter(|&value| value > threshold)
                    .map(|value| (value, index as u64))
            })
            .collect()
    }

    fn elements_all(&self) -> Vec<(f64, u64)> {
        (0..self.values.len())
            .filter_map(|index| {
                comparable_value(&self.values, index).map(|value| (value, index as u64))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition_set(chunks: Vec<Vec<f64>>) -> PartitionSet<ArrayPartition> {
        PartitionSet::new(
            chunks
                .into_iter()
                .map(|chunk| ArrayPartition::new(Float64Array::from(chunk)))
                .collect(),
        )
    }

    #[test]
    fn test_offsets_globalize_rows() {
        let set = partition_set(vec![vec![1.0, 2.0], vec![3.0], vec![4.0, 5.0]]);

        let mut survivors = set.survivors_above(f64::NEG_INFINITY);
        survivors.sort_unstable_by_key(|s| s.row);

        let rows: Vec<u64> = survivors.iter().map(|s| s.row).collect();
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
        assert_eq!(survivors[2].value, 3.0);
        assert_eq!(survivors[3].value, 4.0);
    }

    #[test]
    fn test_merged_stats_matches_flat() {
        let set = partition_set(vec![vec![5.0, 1.0], vec![], vec![9.0, 3.0, 7.0]]);
        let flat = Float64Array::from(vec![5.0, 1.0, 9.0, 3.0, 7.0]);

        let merged = set.merged_stats().unwrap();
        let single = crate::stats::collect_stats(&flat).unwrap();

        assert_eq!(merged.count, single.count);
        assert_eq!(merged.min, single.min);
        assert_eq!(merged.max, single.max);
        assert!((merged.sum - single.sum).abs() < 1e-12);
    }

    #[test]
    fn test_count_above_sums_partitions() {
        let set = partition_set(vec![vec![1.0, 6.0], vec![8.0], vec![2.0, 9.0]]);

        assert_eq!(set.count_above(5.0), 3);
        assert_eq!(set.count_above(8.5), 1);
        assert_eq!(set.count_above(9.0), 0);
    }

    #[test]
    fn test_empty_set_is_empty_source() {
        let set: PartitionSet<ArrayPartition> = PartitionSet::new(vec![]);
        assert!(set.is_empty());
        assert!(matches!(set.merged_stats(), Err(Error::EmptySource)));
    }

    #[test]
    fn test_all_empty_partitions_are_empty_source() {
        let set = partition_set(vec![vec![], vec![]]);
        assert_eq!(set.len(), 2);
        assert!(matches!(set.merged_stats(), Err(Error::EmptySource)));
    }
}
