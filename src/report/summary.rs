//! KS summary report across evaluated score columns

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use std::time::Duration;

use crate::pipeline::ScoreEvaluation;

use super::gains_display::format_fixed;

/// One line of the summary, kept separate from the full gains table
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub score_column: String,
    pub ks: f64,
    pub n_observations: usize,
    pub n_excluded: usize,
    pub n_bins: usize,
}

/// Summary of a KS evaluation run
#[derive(Debug, Default)]
pub struct KsSummary {
    pub rows: Vec<SummaryRow>,
    pub load_time: Option<Duration>,
    pub evaluation_time: Option<Duration>,
}

impl KsSummary {
    /// Build a summary from evaluations already ranked best first
    pub fn new(evaluations: &[ScoreEvaluation]) -> Self {
        let rows = evaluations
            .iter()
            .map(|e| SummaryRow {
                score_column: e.score_column.clone(),
                ks: e.ks,
                n_observations: e.n_observations,
                n_excluded: e.n_excluded,
                n_bins: e.table.len(),
            })
            .collect();

        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = Some(elapsed);
    }

    pub fn set_evaluation_time(&mut self, elapsed: Duration) {
        self.evaluation_time = Some(elapsed);
    }

    /// Column with the highest KS, if any has a defined value
    pub fn best(&self) -> Option<&SummaryRow> {
        self.rows.first().filter(|row| !row.ks.is_nan())
    }

    pub fn render(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Rank").add_attribute(Attribute::Bold),
            Cell::new("Score Column").add_attribute(Attribute::Bold),
            Cell::new("KS").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Excluded").add_attribute(Attribute::Bold),
            Cell::new("Bins").add_attribute(Attribute::Bold),
        ]);

        for (idx, row) in self.rows.iter().enumerate() {
            let ks_cell = Cell::new(format_fixed(row.ks, 2));
            let ks_cell = if idx == 0 && !row.ks.is_nan() {
                ks_cell.fg(Color::Green).add_attribute(Attribute::Bold)
            } else if row.ks.is_nan() {
                ks_cell.fg(Color::Red)
            } else {
                ks_cell
            };

            table.add_row(vec![
                Cell::new(idx + 1),
                Cell::new(&row.score_column),
                ks_cell,
                Cell::new(row.n_observations),
                Cell::new(row.n_excluded).fg(if row.n_excluded == 0 {
                    Color::White
                } else {
                    Color::Yellow
                }),
                Cell::new(row.n_bins),
            ]);
        }

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("KS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        for line in self.render().to_string().lines() {
            println!("    {}", line);
        }

        if let Some(best) = self.best() {
            println!();
            println!(
                "      Best separation: {} {}",
                style(&best.score_column).green().bold(),
                style(format!("(KS {})", format_fixed(best.ks, 2))).dim()
            );
        }

        if let (Some(load), Some(eval)) = (self.load_time, self.evaluation_time) {
            println!(
                "      {}",
                style(format!(
                    "Load {:.2}s, evaluation {:.2}s",
                    load.as_secs_f64(),
                    eval.as_secs_f64()
                ))
                .dim()
            );
        }
    }
}
