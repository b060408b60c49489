//! Error types for gains table construction.
//!
//! Only structural problems with the input are errors. Numeric artifacts inside
//! an otherwise valid table (infinite odds, NaN fractions when a class is
//! absent) are carried as float values instead.

/// Errors that can occur when building a gains table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KsError {
    /// Labels and scores are not aligned index-for-index.
    #[error("Shape mismatch: {labels} label(s) but {scores} score(s)")]
    ShapeMismatch {
        /// Number of labels supplied
        labels: usize,
        /// Number of scores supplied
        scores: usize,
    },

    /// No observations were supplied, so no bucket can be formed.
    #[error("Cannot build a gains table from zero observations")]
    EmptyInput,

    /// A score is NaN and cannot be ranked.
    #[error("Score at index {index} is NaN and cannot be ranked")]
    NanScore {
        /// Zero-based position of the offending score
        index: usize,
    },

    /// The requested bin count cannot be satisfied by the quantile cut.
    ///
    /// Raised when the rank quantile edges are not unique (a single
    /// observation), when `n_bins` is zero or exceeds the number of
    /// observations, or when any bucket would end up empty.
    #[error(
        "Cannot form {n_bins} quantile bin(s) from {n_observations} observation(s): bin edges must be unique"
    )]
    InvalidBinning {
        /// Bin count requested by the caller
        n_bins: usize,
        /// Number of observations available
        n_observations: usize,
    },
}
