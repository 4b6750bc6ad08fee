//! Error types for cumbre
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)
//!
//! Every failure aborts the query and carries enough context (k, population,
//! threshold) to diagnose without re-running the scan. There is no
//! partial-result mode: a selection either returns exactly K ranked values
//! or fails with one of these.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// cumbre error types
#[derive(Error, Debug)]
pub enum Error {
    /// Source column or partition set holds no comparable values
    #[error("Empty source: no comparable values to select from")]
    EmptySource,

    /// K exceeds the number of comparable values in the source
    #[error("Unsatisfiable k: requested {k} values but the source holds only {count}")]
    UnsatisfiableK {
        /// Requested result size
        k: usize,
        /// Comparable values available in the source
        count: usize,
    },

    /// No candidate threshold reached the target population
    ///
    /// Surfaced by the convergence selector; the engine recovers by falling
    /// back to exhaustive selection, so callers of the full pipeline never
    /// observe this directly.
    #[error("Candidate series exhausted: no threshold reached population >= {k} (best seen: {best})")]
    SeriesExhausted {
        /// Requested result size
        k: usize,
        /// Largest population among evaluated candidates
        best: usize,
    },

    /// Harvest produced fewer survivors than the selected threshold promised
    ///
    /// Indicates selector/evaluator disagreement, not a data condition. Fatal,
    /// never retried.
    #[error("Harvest shortfall at threshold {threshold}: expected at least {expected} survivors, found {found}")]
    HarvestShortfall {
        /// Survivors the selected threshold guaranteed
        expected: usize,
        /// Survivors actually extracted
        found: usize,
        /// The selected threshold
        threshold: f64,
    },

    /// Invalid caller input (e.g. k = 0)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
