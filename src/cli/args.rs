//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{TargetMapping, DEFAULT_BINS};

/// ksmetric - Gains tables and KS separation for binary classifier scores
#[derive(Parser, Debug)]
#[command(name = "ksmetric")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column name (1 = bad / event, 0 = good / non-event)
    #[arg(short, long)]
    pub target: String,

    /// Score columns to evaluate (comma-separated).
    /// Defaults to every numeric column other than the target.
    #[arg(short, long, value_delimiter = ',')]
    pub scores: Vec<String>,

    /// Number of quantile bins per gains table
    #[arg(short, long, default_value_t = DEFAULT_BINS, value_parser = validate_bins)]
    pub bins: usize,

    /// Value in target column that represents EVENT (maps to 1).
    /// Required with --non-event-value when target is not binary 0/1.
    #[arg(long, requires = "non_event_value")]
    pub event_value: Option<String>,

    /// Value in target column that represents NON-EVENT (maps to 0).
    /// Required with --event-value when target is not binary 0/1.
    #[arg(long, requires = "event_value")]
    pub non_event_value: Option<String>,

    /// Write all gains tables and KS values to this JSON file
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Write the gains table of the best score column to this CSV file
    #[arg(long)]
    pub gains_output: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for a full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Only print the summary, not each gains table
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Target mapping when both event and non-event values were given
    pub fn target_mapping(&self) -> Option<TargetMapping> {
        match (&self.event_value, &self.non_event_value) {
            (Some(event), Some(non_event)) => {
                Some(TargetMapping::new(event.clone(), non_event.clone()))
            }
            _ => None,
        }
    }
}

/// Validator for the bin count
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if value == 0 {
        Err("bins must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
