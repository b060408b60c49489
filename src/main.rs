//! ksmetric: KS evaluation CLI
//!
//! Loads a dataset, builds a gains table for each score column against a
//! binary target and ranks the columns by KS.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use ksmetric::cli::Cli;
use ksmetric::pipeline::{evaluate_score_columns, load_dataset_with_progress, numeric_score_columns};
use ksmetric::report::{display_gains_table, export_ks_analysis, write_gains_csv, ExportParams, KsSummary};
use ksmetric::utils::{
    print_banner, print_completion, print_config, print_info, print_step_header, print_step_time,
    print_success, print_warning, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let target_mapping = cli.target_mapping();

    print_banner(env!("CARGO_PKG_VERSION"));

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, rows, cols) = load_dataset_with_progress(&cli.input, cli.infer_schema_length)?;
    print_info(&format!("{} rows, {} columns", rows, cols));
    let load_elapsed = step_start.elapsed();
    print_step_time(load_elapsed);

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if !column_names.contains(&cli.target) {
        anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            cli.target,
            column_names
        );
    }

    let score_columns = if cli.scores.is_empty() {
        numeric_score_columns(&df, &cli.target)
    } else {
        cli.scores.clone()
    };
    if score_columns.is_empty() {
        anyhow::bail!("No numeric score columns found. Use -s/--scores to name them.");
    }

    print_config(&ConfigCard {
        input: &cli.input,
        target: &cli.target,
        score_columns: &score_columns,
        bins: cli.bins,
        json_output: cli.json_output.as_deref(),
    });

    // Step 2: Gains tables
    print_step_header(2, "Gains Tables");
    let step_start = Instant::now();
    let evaluations = evaluate_score_columns(
        &df,
        &cli.target,
        &score_columns,
        target_mapping.as_ref(),
        cli.bins,
    )?;
    print_success(&format!("Built {} gains table(s)", evaluations.len()));

    for evaluation in &evaluations {
        if evaluation.n_excluded > 0 {
            print_warning(&format!(
                "{}: excluded {} row(s) with a missing label or score",
                evaluation.score_column, evaluation.n_excluded
            ));
        }
        if evaluation.ks.is_nan() {
            print_warning(&format!(
                "{}: KS is undefined because only one class is present",
                evaluation.score_column
            ));
        }
        if !cli.quiet {
            display_gains_table(&evaluation.score_column, &evaluation.table);
        }
    }
    let evaluation_elapsed = step_start.elapsed();
    print_step_time(evaluation_elapsed);

    let mut summary = KsSummary::new(&evaluations);
    summary.set_load_time(load_elapsed);
    summary.set_evaluation_time(evaluation_elapsed);
    summary.display();

    // Step 3: Save results
    if cli.json_output.is_some() || cli.gains_output.is_some() {
        print_step_header(3, "Save Results");

        if let Some(path) = &cli.json_output {
            let input_file = cli.input.display().to_string();
            export_ks_analysis(
                &evaluations,
                path,
                &ExportParams {
                    input_file: &input_file,
                    target_column: &cli.target,
                    event_value: cli.event_value.as_deref(),
                    non_event_value: cli.non_event_value.as_deref(),
                    num_bins: cli.bins,
                },
            )?;
            print_success(&format!("KS analysis saved to {}", path.display()));
        }

        if let Some(path) = &cli.gains_output {
            if let Some(best) = evaluations.first() {
                write_gains_csv(&best.table, path)?;
                print_success(&format!(
                    "Gains table for '{}' saved to {}",
                    best.score_column,
                    path.display()
                ));
            }
        }
    }

    print_completion();

    Ok(())
}
