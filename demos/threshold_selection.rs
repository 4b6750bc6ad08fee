//! Threshold-convergent Top-K selection demonstration
//!
//! This example demonstrates selecting the K largest values of a large
//! numeric column with converging linear counting passes instead of a
//! full descending sort.
//!
//! Algorithm: a handful of O(N) counting scans plus an exact sort over the
//! small surviving subset, vs O(N log N) for sorting the whole column.
//!
//! Run with: cargo run --example threshold_selection --release

use arrow::array::Float64Array;
use cumbre::{ArrayPartition, Hypothesis, PartitionSet, SeriesPolicy, ThresholdTopK};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

const NUM_ROWS: usize = 1_000_000;
const K: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== cumbre Threshold-Convergent Selection Example ===\n");

    println!("Creating sample dataset ({NUM_ROWS} rows)...");
    let values = sample_scores(NUM_ROWS);
    let column = Float64Array::from(values.clone());
    println!("  ✓ Created column: {} rows\n", column.len());

    // Fixed-fraction policy: one concurrent candidate batch
    println!("=== Top-{K} Scores (fixed-fraction series) ===");
    let engine = ThresholdTopK::builder()
        .hypothesis(Hypothesis::Normal)
        .series(SeriesPolicy::FixedFraction)
        .build();

    let start = Instant::now();
    let top = engine.select(&column, K)?;
    let duration = start.elapsed();

    println!("  Candidate batch priced in one concurrent round");
    println!("  Time: {duration:?}");
    println!("  Results:");
    for (rank, ranked) in top.iter().enumerate() {
        println!(
            "    #{}: row={}, score={:.2}",
            rank + 1,
            ranked.row,
            ranked.value
        );
    }
    println!();

    // Doubling policy: sequential chain, fewer total scans on a good estimate
    println!("=== Top-{K} Scores (doubling series) ===");
    let doubling = ThresholdTopK::builder()
        .series(SeriesPolicy::Doubling)
        .build();

    let start = Instant::now();
    let top_doubling = doubling.select(&column, K)?;
    let duration = start.elapsed();

    println!("  Walked outward from the estimate, one scan per step");
    println!("  Time: {duration:?}");
    assert_eq!(top, top_doubling);
    println!("  ✓ Identical result to the fixed-fraction policy\n");

    // Full-sort baseline for comparison
    println!("=== Full-Sort Baseline ===");
    let start = Instant::now();
    let mut sorted = values.clone();
    sorted.sort_unstable_by(|a, b| b.total_cmp(a));
    sorted.truncate(K);
    let duration = start.elapsed();

    println!("  Time: {duration:?}");
    let engine_values: Vec<f64> = top.iter().map(|r| r.value).collect();
    assert_eq!(engine_values, sorted);
    println!("  ✓ Engine agrees with the full sort\n");

    // Partitioned execution: same pipeline over 8 disjoint partitions
    println!("=== Partitioned Selection (8 partitions) ===");
    let set = PartitionSet::new(
        values
            .chunks(NUM_ROWS / 8)
            .map(|chunk| ArrayPartition::new(Float64Array::from(chunk.to_vec())))
            .collect(),
    );

    let start = Instant::now();
    let top_partitioned = engine.select_partitioned(&set, K)?;
    let duration = start.elapsed();

    println!("  Per-partition statistics and counts combined associatively");
    println!("  Time: {duration:?}");
    assert_eq!(top, top_partitioned);
    println!("  ✓ Identical result to the flat column (global row identities)\n");

    println!("=== Algorithm Explanation ===");
    println!("  1. One pass collects {{min, max, count, sum, sum of squares}}");
    println!("  2. The distribution hypothesis places an initial cutoff estimate");
    println!("  3. Candidate thresholds are priced with linear counting scans");
    println!("  4. The tightest threshold with population >= K wins");
    println!("  5. Only the survivors are sorted exactly and truncated to K\n");

    println!("=== Performance Benefits ===");
    println!("✓ Memory: survivors only, never a sorted copy of the column");
    println!("✓ Scans: statistics + candidates + harvest, each trivially parallel");
    println!("✓ Termination: the doubling recurrence covers the range in O(log) steps");
    println!("✓ Use case: ORDER BY ... LIMIT K over columns too large to sort in RAM\n");

    Ok(())
}

fn sample_scores(num_rows: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..num_rows).map(|_| rng.gen_range(0.0..1000.0)).collect()
}
