//! Scorer adapters for model-selection tooling
//!
//! A scorer takes `(y_true, y_pred)` and returns a single number together with
//! an orientation, so generic selection code can always maximize `signed_score`.

use super::error::KsError;
use super::gains::{ks_score, DEFAULT_BINS};

/// Uniform two-argument scoring contract
pub trait Scorer: Send + Sync {
    /// Short name used in reports
    fn name(&self) -> &str;

    /// Whether larger raw scores indicate a better model
    fn greater_is_better(&self) -> bool;

    /// Raw metric value for aligned truth and prediction
    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64, KsError>;

    /// Metric value oriented so that larger is always better
    fn signed_score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64, KsError> {
        let sign = if self.greater_is_better() { 1.0 } else { -1.0 };
        Ok(sign * self.score(y_true, y_pred)?)
    }
}

/// Scorer built from any metric function
pub struct FnScorer<F> {
    name: String,
    metric: F,
    greater_is_better: bool,
}

impl<F> FnScorer<F>
where
    F: Fn(&[f64], &[f64]) -> Result<f64, KsError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, metric: F, greater_is_better: bool) -> Self {
        Self {
            name: name.into(),
            metric,
            greater_is_better,
        }
    }
}

impl<F> Scorer for FnScorer<F>
where
    F: Fn(&[f64], &[f64]) -> Result<f64, KsError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn greater_is_better(&self) -> bool {
        self.greater_is_better
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64, KsError> {
        (self.metric)(y_true, y_pred)
    }
}

/// Wrap a metric function behind the `Scorer` contract
pub fn make_scorer<F>(name: impl Into<String>, metric: F, greater_is_better: bool) -> FnScorer<F>
where
    F: Fn(&[f64], &[f64]) -> Result<f64, KsError> + Send + Sync,
{
    FnScorer::new(name, metric, greater_is_better)
}

/// KS statistic as a maximizing scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KsScorer {
    /// Number of quantile bins passed through to the gains table
    pub n_bins: usize,
}

impl KsScorer {
    pub fn new(n_bins: usize) -> Self {
        Self { n_bins }
    }
}

impl Default for KsScorer {
    fn default() -> Self {
        Self::new(DEFAULT_BINS)
    }
}

impl Scorer for KsScorer {
    fn name(&self) -> &str {
        "ks"
    }

    fn greater_is_better(&self) -> bool {
        true
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64, KsError> {
        ks_score(y_true, y_pred, self.n_bins)
    }
}

/// Default KS scorer with ten bins
pub fn ks_scorer() -> KsScorer {
    KsScorer::default()
}
