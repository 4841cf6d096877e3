//! Output formatting

use serde_json::{json, Value};
use spar_metrics::HistogramSummary;
use spar_model::{BatchReport, ConflictStats};
use spar_primitives::LedgerSeq;
use std::collections::BTreeMap;

/// Width of the longest histogram bar
const BAR_WIDTH: u64 = 40;

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: BTreeMap<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: BTreeMap::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a u64 field to the output
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Print the output
    pub fn print(self) {
        if self.json_mode {
            let json = json!(self.fields);
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        } else if let Some(msg) = self.message {
            println!("{}", msg);
        }
    }
}

/// Free fraction as a percentage, `-` for an empty ledger
pub fn percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{:.1}%", f * 100.0),
        None => "-".to_string(),
    }
}

/// Join lines into a newline-terminated block
fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// One line per ledger, in ledger order
pub fn render_ledger_table(reports: &[(LedgerSeq, BatchReport)]) -> String {
    let header = format!("{:<12} {:>8} {:>11} {:>8}", "ledger", "free", "conflicted", "free%");
    let rows = reports.iter().map(|(seq, report)| {
        format!(
            "{:<12} {:>8} {:>11} {:>8}",
            seq,
            report.free,
            report.conflicted,
            percent(report.free_fraction())
        )
    });
    block(std::iter::once(header).chain(rows).collect())
}

/// Conflict counts per key and per reason
pub fn render_stats(stats: &ConflictStats) -> String {
    fn section<K: std::fmt::Display>(
        title: &str,
        counts: &BTreeMap<K, u64>,
        lines: &mut Vec<String>,
    ) {
        lines.push(title.to_string());
        if counts.is_empty() {
            lines.push("  (none)".to_string());
        }
        lines.extend(
            counts
                .iter()
                .map(|(key, count)| format!("  {:<36} {:>8}", key, count)),
        );
    }

    let mut lines = Vec::new();
    section("conflicts by operation:", &stats.conflicts, &mut lines);
    section("conflicts by reason:", &stats.reasons, &mut lines);
    block(lines)
}

/// ASCII bar chart of a histogram, bars scaled to the fullest bucket
pub fn render_histogram(summary: &HistogramSummary) -> String {
    let peak = summary
        .buckets
        .iter()
        .map(|(_, count)| *count)
        .chain(std::iter::once(summary.overflow))
        .max()
        .unwrap_or(0);

    let bar = |count: u64| -> String {
        if peak == 0 {
            return String::new();
        }
        let len = (count * BAR_WIDTH).div_ceil(peak);
        "#".repeat(len as usize)
    };

    let mut lines: Vec<String> = summary
        .buckets
        .iter()
        .map(|(bound, count)| format!("  <= {:<6.2} | {:<40} {}", bound, bar(*count), count))
        .collect();
    if summary.overflow > 0 {
        lines.push(format!(
            "  {:<9} | {:<40} {}",
            "above",
            bar(summary.overflow),
            summary.overflow
        ));
    }
    block(lines)
}
