//! ksmetric: Kolmogorov-Smirnov separation for binary classifiers
//!
//! Builds score-ranked gains tables from labels and predicted scores and
//! reports the KS statistic, the largest gap between the cumulative bad and
//! cumulative good distributions.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use pipeline::{build_gains_table, ks_score, ks_scorer, GainsBin, GainsTable, KsError, Scorer};
