//! Partitioned-adapter equivalence tests
//!
//! For any disjoint partitioning of a column, selection over the partition
//! set must return exactly what selection over the flat column returns:
//! same values, same globalized rows, same tie-breaks.

use arrow::array::Float64Array;
use cumbre::{ArrayPartition, Error, Hypothesis, PartitionSet, SeriesPolicy, ThresholdTopK};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Split `values` into consecutive chunks of the given sizes
///
/// Sizes must sum to `values.len()`; zero-length chunks model empty
/// partitions.
fn partition_at(values: &[f64], sizes: &[usize]) -> PartitionSet<ArrayPartition> {
    assert_eq!(sizes.iter().sum::<usize>(), values.len());
    let mut partitions = Vec::with_capacity(sizes.len());
    let mut start = 0;
    for &size in sizes {
        let chunk: Vec<f64> = values[start..start + size].to_vec();
        partitions.push(ArrayPartition::new(Float64Array::from(chunk)));
        start += size;
    }
    PartitionSet::new(partitions)
}

fn uniform_values(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0.0..10_000.0)).collect()
}

#[test]
fn test_partitioned_matches_flat() {
    let values = uniform_values(4_096, 13);
    let column = Float64Array::from(values.clone());
    let engine = ThresholdTopK::new();

    let partitionings: Vec<Vec<usize>> = vec![
        vec![4_096],
        vec![2_048, 2_048],
        vec![1, 4_094, 1],
        vec![0, 1_000, 0, 3_096],
        vec![512; 8],
    ];

    for sizes in partitionings {
        let set = partition_at(&values, &sizes);
        for k in [1, 64, 1_000] {
            let flat = engine.select(&column, k).unwrap();
            let partitioned = engine.select_partitioned(&set, k).unwrap();
            assert_eq!(partitioned, flat, "divergence for k={k}, sizes={sizes:?}");
        }
    }
}

#[test]
fn test_partitioned_matches_flat_all_policies() {
    let values = uniform_values(2_000, 29);
    let column = Float64Array::from(values.clone());
    let set = partition_at(&values, &[700, 600, 700]);

    for hypothesis in [Hypothesis::Uniform, Hypothesis::Normal] {
        for series in [SeriesPolicy::Doubling, SeriesPolicy::FixedFraction] {
            let engine = ThresholdTopK::builder()
                .hypothesis(hypothesis)
                .series(series)
                .build();
            let flat = engine.select(&column, 150).unwrap();
            let partitioned = engine.select_partitioned(&set, 150).unwrap();
            assert_eq!(partitioned, flat);
        }
    }
}

#[test]
fn test_cross_partition_ties_use_global_rows() {
    // The duplicate maximum spans partitions; global rows must decide
    let values = vec![50.0, 9.0, 50.0, 1.0, 50.0, 2.0];
    let set = partition_at(&values, &[2, 2, 2]);
    let engine = ThresholdTopK::new();

    let result = engine.select_partitioned(&set, 2).unwrap();

    assert_eq!(result[0].value, 50.0);
    assert_eq!(result[0].row, 0);
    assert_eq!(result[1].value, 50.0);
    assert_eq!(result[1].row, 2);
}

#[test]
fn test_partitioned_with_missing_values() {
    let engine = ThresholdTopK::new();
    let set = PartitionSet::new(vec![
        ArrayPartition::new(Float64Array::from(vec![Some(3.0), None, Some(8.0)])),
        ArrayPartition::new(Float64Array::from(vec![Some(f64::NAN), Some(5.0)])),
    ]);

    let result = engine.select_partitioned(&set, 2).unwrap();
    let values: Vec<f64> = result.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![8.0, 5.0]);

    // Null slots still occupy physical rows: 8.0 sits at global row 2,
    // 5.0 at global row 4
    assert_eq!(result[0].row, 2);
    assert_eq!(result[1].row, 4);
}

#[test]
fn test_partitioned_full_column_request() {
    let values = vec![4.0, 6.0, 2.0, 8.0];
    let set = partition_at(&values, &[2, 2]);
    let engine = ThresholdTopK::new();

    let result = engine.select_partitioned(&set, 4).unwrap();
    let values: Vec<f64> = result.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![8.0, 6.0, 4.0, 2.0]);
}

#[test]
fn test_partitioned_error_scenarios() {
    let engine = ThresholdTopK::new();

    let empty: PartitionSet<ArrayPartition> = PartitionSet::new(vec![]);
    assert!(matches!(
        engine.select_partitioned(&empty, 1),
        Err(Error::EmptySource)
    ));

    let hollow = PartitionSet::new(vec![
        ArrayPartition::new(Float64Array::from(Vec::<f64>::new())),
        ArrayPartition::new(Float64Array::from(vec![None, Some(f64::NAN)])),
    ]);
    assert!(matches!(
        engine.select_partitioned(&hollow, 1),
        Err(Error::EmptySource)
    ));

    let small = PartitionSet::new(vec![ArrayPartition::new(Float64Array::from(vec![
        1.0, 2.0,
    ]))]);
    assert!(matches!(
        engine.select_partitioned(&small, 5),
        Err(Error::UnsatisfiableK { k: 5, count: 2 })
    ));
}
