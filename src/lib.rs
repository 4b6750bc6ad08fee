//! # cumbre: Threshold-Convergent Top-K Selection
//!
//! **Problem**: `ORDER BY ... LIMIT K` over a large numeric column is
//! O(N log N) and memory-hungry; the sort touches every element even though
//! only K survive.
//!
//! **Solution**: converge on a cutoff threshold with cheap linear counting
//! passes, then exact-sort only the small surviving subset:
//!
//! 1. **Collect** one-pass statistics {min, max, count, sum, sum of squares}
//! 2. **Estimate** an initial cutoff from a distribution hypothesis
//! 3. **Generate** a candidate threshold series across the value range
//! 4. **Evaluate** each candidate's population (values strictly above it)
//! 5. **Select** the tightest threshold whose population still covers K
//! 6. **Harvest** the survivors and exact-sort only that small subset
//!
//! Every stage is a stateless fan-out/fan-in over read-only data, so chunked
//! statistics, candidate evaluation, and per-partition scans all parallelize
//! with nothing but a join barrier. Partitioned sources run the identical
//! pipeline through the [`partition::Partition`] trait.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Muda elimination**: no full sort; counting passes touch each value once
//! - **Jidoka**: convergence failures surface as typed errors, never as a
//!   silently truncated result
//! - **Genchi Genbutsu**: criterion benchmarks measure against the full-sort
//!   baseline (`benches/selection.rs`)
//!
//! ## Example
//!
//! ```rust
//! use arrow::array::Float64Array;
//! use cumbre::{Hypothesis, SeriesPolicy, ThresholdTopK};
//!
//! # fn main() -> cumbre::Result<()> {
//! let scores = Float64Array::from(vec![12.5, 98.0, 41.3, 77.1, 63.9, 85.2]);
//!
//! let engine = ThresholdTopK::builder()
//!     .hypothesis(Hypothesis::Normal)
//!     .series(SeriesPolicy::FixedFraction)
//!     .build();
//!
//! let top3 = engine.select(&scores, 3)?;
//! let values: Vec<f64> = top3.iter().map(|r| r.value).collect();
//! assert_eq!(values, vec![98.0, 85.2, 77.1]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod engine;
pub mod error;
pub mod estimate;
pub mod evaluate;
pub mod harvest;
pub mod partition;
pub mod quantile;
pub mod select;
pub mod series;
pub mod stats;

pub use engine::{ThresholdTopK, ThresholdTopKBuilder};
pub use error::{Error, Result};
pub use estimate::Hypothesis;
pub use harvest::RankedValue;
pub use partition::{ArrayPartition, Partition, PartitionSet};
pub use series::SeriesPolicy;
pub use stats::ColumnStats;
