use crate::trace::{format_score, Algorithm, Summary};
use std::fmt::Write;

/// One finished replay, as shown in the comparison table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub algorithm: Algorithm,
    pub cost: Option<f64>,
    pub path_length: Option<usize>,
    pub nodes_explored: usize,
    pub elapsed_ms: f64,
    pub path_found: bool,
}

impl From<&Summary> for ComparisonRow {
    fn from(summary: &Summary) -> Self {
        Self {
            algorithm: summary.algorithm,
            cost: summary.cost,
            path_length: if summary.path_found {
                Some(summary.path_length)
            } else {
                None
            },
            nodes_explored: summary.nodes_explored,
            elapsed_ms: summary.elapsed_ms,
            path_found: summary.path_found,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, summary: &Summary) {
        self.rows.push(ComparisonRow::from(summary));
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<24} {:>8} {:>8} {:>10} {:>10} {:>6}",
            "Algorithm", "Cost", "Length", "Explored", "Time (ms)", "Found"
        );

        for row in self.rows.iter() {
            let cost = row
                .cost
                .map(format_score)
                .unwrap_or_else(|| "N/A".to_string());
            let length = row
                .path_length
                .map(|length| length.to_string())
                .unwrap_or_else(|| "N/A".to_string());

            let _ = writeln!(
                out,
                "{:<24} {:>8} {:>8} {:>10} {:>10} {:>6}",
                row.algorithm.display_name(),
                cost,
                length,
                row.nodes_explored,
                format_score(row.elapsed_ms),
                if row.path_found { "Yes" } else { "No" }
            );
        }

        out
    }
}
