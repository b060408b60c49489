//! KS analysis export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{GainsTable, ScoreEvaluation};

use super::gains_display::gains_table_to_dataframe;

/// Metadata about the evaluation run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (RFC 3339)
    pub timestamp: String,
    /// ksmetric version
    pub ksmetric_version: String,
    /// Input file path
    pub input_file: String,
    /// Target column name
    pub target_column: String,
    /// Event value when the target was mapped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_value: Option<String>,
    /// Non-event value when the target was mapped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_event_value: Option<String>,
    /// Number of quantile bins requested
    pub num_bins: usize,
}

/// Complete KS analysis export with metadata
#[derive(Serialize)]
pub struct KsAnalysisExport<'a> {
    pub metadata: AnalysisMetadata,
    /// Name of the column with the highest KS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score_column: Option<&'a str>,
    /// Per-column results, best KS first
    pub evaluations: &'a [ScoreEvaluation],
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
    pub event_value: Option<&'a str>,
    pub non_event_value: Option<&'a str>,
    pub num_bins: usize,
}

/// Export KS evaluations to a pretty-printed JSON file
///
/// Non-finite values (infinite odds, NaN separations) are written as `null`.
pub fn export_ks_analysis(
    evaluations: &[ScoreEvaluation],
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = KsAnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            ksmetric_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            target_column: params.target_column.to_string(),
            event_value: params.event_value.map(|s| s.to_string()),
            non_event_value: params.non_event_value.map(|s| s.to_string()),
            num_bins: params.num_bins,
        },
        best_score_column: evaluations
            .first()
            .filter(|e| !e.ks.is_nan())
            .map(|e| e.score_column.as_str()),
        evaluations,
    };

    let json =
        serde_json::to_string_pretty(&export).context("Failed to serialize KS analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write KS analysis to {}", output_path.display()))?;

    Ok(())
}

/// Write a gains table to CSV using the display columns
pub fn write_gains_csv(table: &GainsTable, output_path: &Path) -> Result<()> {
    let mut df = gains_table_to_dataframe(table).context("Failed to build gains table frame")?;

    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", output_path.display()))?;

    Ok(())
}
