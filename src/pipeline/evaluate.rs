//! KS evaluation of score columns in a data frame
//!
//! Each score column is paired with the target, cleaned of unusable rows and
//! turned into a gains table. Columns are independent, so they run in parallel.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use super::gains::{build_gains_table, GainsTable};
use super::scorer::{KsScorer, Scorer};
use super::target::{target_labels, TargetMapping};

/// Aligned labels and scores for one score column
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    pub labels: Vec<f64>,
    pub scores: Vec<f64>,
    /// Rows dropped because the label or the score was missing
    pub excluded: usize,
}

/// Gains table and KS for a single score column
#[derive(Debug, Clone, Serialize)]
pub struct ScoreEvaluation {
    /// Name of the evaluated score column
    pub score_column: String,
    /// Rows that entered the gains table
    pub n_observations: usize,
    /// Rows excluded for a missing label or score
    pub n_excluded: usize,
    /// KS statistic of the column
    pub ks: f64,
    /// Full gains table
    pub table: GainsTable,
}

/// Pair a score column with per-row labels, skipping rows where either is missing
///
/// Null scores and NaN scores are both treated as missing.
pub fn extract_observations(
    df: &DataFrame,
    score_column: &str,
    labels: &[Option<f64>],
) -> Result<Observations> {
    let score_col = df
        .column(score_column)
        .with_context(|| format!("Score column '{}' not found", score_column))?;

    if !score_col.dtype().is_primitive_numeric() {
        anyhow::bail!(
            "Score column '{}' has type {} but must be numeric",
            score_column,
            score_col.dtype()
        );
    }

    let scores = score_col.cast(&DataType::Float64)?;
    let mut observations = Observations {
        labels: Vec::with_capacity(labels.len()),
        scores: Vec::with_capacity(labels.len()),
        excluded: 0,
    };

    for (label, score) in labels.iter().zip(scores.f64()?.into_iter()) {
        match (label, score) {
            (Some(label), Some(score)) if !score.is_nan() => {
                observations.labels.push(*label);
                observations.scores.push(score);
            }
            _ => observations.excluded += 1,
        }
    }

    Ok(observations)
}

/// All primitive numeric columns except the target
pub fn numeric_score_columns(df: &DataFrame, target: &str) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric() && col.name() != target)
        .map(|col| col.name().to_string())
        .collect()
}

/// Build a gains table for one score column from precomputed labels
pub fn evaluate_score_column(
    df: &DataFrame,
    score_column: &str,
    labels: &[Option<f64>],
    n_bins: usize,
) -> Result<ScoreEvaluation> {
    let observations = extract_observations(df, score_column, labels)?;
    let table = build_gains_table(&observations.labels, &observations.scores, n_bins)
        .with_context(|| format!("Failed to build gains table for '{}'", score_column))?;

    Ok(ScoreEvaluation {
        score_column: score_column.to_string(),
        n_observations: observations.labels.len(),
        n_excluded: observations.excluded,
        ks: table.ks,
        table,
    })
}

/// Evaluate several score columns against the target
///
/// # Arguments
/// * `df` - Loaded dataset
/// * `target` - Name of the binary target column
/// * `score_columns` - Columns holding classifier scores
/// * `target_mapping` - Optional mapping for non-binary target columns
/// * `n_bins` - Quantile bins per gains table
///
/// # Returns
/// One evaluation per column, best KS first (NaN KS last)
pub fn evaluate_score_columns(
    df: &DataFrame,
    target: &str,
    score_columns: &[String],
    target_mapping: Option<&TargetMapping>,
    n_bins: usize,
) -> Result<Vec<ScoreEvaluation>> {
    let labels = target_labels(df, target, target_mapping)?;

    if score_columns.is_empty() {
        return Ok(Vec::new());
    }

    let total = score_columns.len() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   Building gains tables [{bar:40.cyan/blue}] {pos}/{len} columns [{eta}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let progress_counter = AtomicU64::new(0);

    let results: Vec<Result<ScoreEvaluation>> = score_columns
        .par_iter()
        .map(|col_name| {
            let result = evaluate_score_column(df, col_name, &labels, n_bins);
            let done = progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_position(done);
            result
        })
        .collect();

    pb.finish_and_clear();

    let mut evaluations = results.into_iter().collect::<Result<Vec<_>>>()?;
    rank_evaluations(&mut evaluations, &KsScorer::new(n_bins));

    Ok(evaluations)
}

/// Sort evaluations best first according to the scorer's orientation
pub fn rank_evaluations(evaluations: &mut [ScoreEvaluation], scorer: &dyn Scorer) {
    let sign = if scorer.greater_is_better() { 1.0 } else { -1.0 };
    evaluations.sort_by(|a, b| {
        let (a, b) = (sign * a.ks, sign * b.ks);
        match (a.is_nan(), b.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal),
        }
    });
}
