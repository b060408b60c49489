//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Labels and scores where every good scores below every bad
pub fn perfect_separation() -> (Vec<f64>, Vec<f64>) {
    (
        vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
    )
}

/// Random labels with scores that carry a controllable amount of signal
///
/// `signal = 0.0` gives scores independent of the label.
pub fn random_scored_labels(n: usize, bad_rate: f64, signal: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let labels: Vec<f64> = (0..n)
        .map(|_| if rng.gen::<f64>() < bad_rate { 1.0 } else { 0.0 })
        .collect();
    let scores = labels
        .iter()
        .map(|label| rng.gen::<f64>() + signal * label)
        .collect();
    (labels, scores)
}

/// DataFrame with a binary target and score columns of different quality
///
/// - `target`: 0/1
/// - `model_good`: separates the classes perfectly
/// - `model_noise`: unrelated to the target
/// - `model_sparse`: same as `model_good` with two nulls
/// - `segment`: text column that must not be picked up as a score
pub fn create_scores_dataframe() -> DataFrame {
    df! {
        "target" => [0i32, 0, 0, 0, 0, 1, 1, 1, 1, 1],
        "model_good" => [0.05f64, 0.10, 0.15, 0.20, 0.25, 0.70, 0.75, 0.80, 0.85, 0.90],
        "model_noise" => [0.50f64, 0.20, 0.90, 0.40, 0.60, 0.30, 0.80, 0.10, 0.70, 0.55],
        "model_sparse" => [Some(0.05f64), None, Some(0.15), Some(0.20), Some(0.25), Some(0.70), None, Some(0.80), Some(0.85), Some(0.90)],
        "segment" => ["a", "b", "a", "b", "a", "b", "a", "b", "a", "b"],
    }
    .unwrap()
}

/// Same shape as `create_scores_dataframe` but with a text target
pub fn create_text_target_dataframe() -> DataFrame {
    df! {
        "status" => ["good", "good", "good", "good", "bad", "bad", "bad", "bad", "unknown"],
        "score" => [0.1f64, 0.2, 0.3, 0.4, 0.6, 0.7, 0.8, 0.9, 0.5],
    }
    .unwrap()
}

/// Float target with NaN labels in two rows
pub fn create_nan_target_dataframe() -> DataFrame {
    df! {
        "target" => [0.0f64, f64::NAN, 0.0, 0.0, 1.0, 1.0, f64::NAN, 1.0],
        "score" => [0.1f64, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats are within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} within {}, got {}",
        expected,
        tol,
        actual
    );
}
