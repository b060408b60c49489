//! Presentation of gains tables
//!
//! The table itself stays numeric; this module is the only place values are
//! turned into fixed-decimal and percent strings.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use polars::prelude::*;

use crate::pipeline::{GainsBin, GainsTable};

/// Marker printed next to the bin(s) reaching the KS value
pub const KS_MARKER: &str = "<--";

/// Column headers shared by the terminal table and the data frame
pub const GAINS_COLUMNS: [&str; 12] = [
    "min_score",
    "max_score",
    "n_bads",
    "n_goods",
    "n_total",
    "odds",
    "bad_rate",
    "good_rate",
    "cs_bads",
    "cs_goods",
    "sep",
    "KS",
];

/// Fixed-decimal formatting that spells non-finite values as `inf`, `-inf` and `nan`
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Fraction shown as a percentage with two decimals (0.125 -> "12.50%")
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", format_fixed(fraction * 100.0, 2))
}

/// Display strings for one bin, in `GAINS_COLUMNS` order
fn bin_row(bin: &GainsBin) -> [String; 12] {
    [
        format_number(bin.min_score),
        format_number(bin.max_score),
        format_number(bin.count_bad),
        format_number(bin.count_good),
        format_number(bin.count_total),
        format_fixed(bin.odds, 2),
        format_percent(bin.bad_rate),
        format_percent(bin.good_rate),
        format_fixed(bin.cumulative_bad_pct, 2),
        format_fixed(bin.cumulative_good_pct, 2),
        format_fixed(bin.separation, 2),
        ks_flag(bin).to_string(),
    ]
}

fn ks_flag(bin: &GainsBin) -> &'static str {
    if bin.is_max_separation {
        KS_MARKER
    } else {
        ""
    }
}

/// Shortest round-trip representation for raw values (scores and counts)
fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{}", value)
    } else {
        format_fixed(value, 0)
    }
}

/// Render a gains table for the terminal
pub fn render_gains_table(table: &GainsTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(
        GAINS_COLUMNS
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for bin in &table.bins {
        let row = bin_row(bin);
        let cells: Vec<Cell> = row
            .into_iter()
            .map(|value| {
                let cell = Cell::new(value).set_alignment(CellAlignment::Right);
                if bin.is_max_separation {
                    cell.fg(Color::Green).add_attribute(Attribute::Bold)
                } else {
                    cell
                }
            })
            .collect();
        out.add_row(cells);
    }

    out
}

/// Print a gains table indented under a heading
pub fn display_gains_table(score_column: &str, table: &GainsTable) {
    println!();
    println!(
        "    {} {}  {}",
        console::style("▸").cyan(),
        console::style(score_column).white().bold(),
        console::style(format!("KS = {}", format_fixed(table.ks, 2))).yellow()
    );

    for line in render_gains_table(table).to_string().lines() {
        println!("    {}", line);
    }
}

/// Gains table as a data frame with the same columns as the terminal view
///
/// Counts and scores stay numeric; odds, rates, cumulative percentages and
/// separation are formatted strings.
pub fn gains_table_to_dataframe(table: &GainsTable) -> PolarsResult<DataFrame> {
    let numeric = |f: fn(&GainsBin) -> f64| -> Vec<f64> { table.bins.iter().map(f).collect() };
    let text = |f: fn(&GainsBin) -> String| -> Vec<String> { table.bins.iter().map(f).collect() };

    df! {
        "min_score" => numeric(|b| b.min_score),
        "max_score" => numeric(|b| b.max_score),
        "n_bads" => numeric(|b| b.count_bad),
        "n_goods" => numeric(|b| b.count_good),
        "n_total" => numeric(|b| b.count_total),
        "odds" => text(|b| format_fixed(b.odds, 2)),
        "bad_rate" => text(|b| format_percent(b.bad_rate)),
        "good_rate" => text(|b| format_percent(b.good_rate)),
        "cs_bads" => text(|b| format_fixed(b.cumulative_bad_pct, 2)),
        "cs_goods" => text(|b| format_fixed(b.cumulative_good_pct, 2)),
        "sep" => text(|b| format_fixed(b.separation, 2)),
        "KS" => text(|b| ks_flag(b).to_string()),
    }
}
