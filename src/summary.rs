//! Shutdown report for destroyed encoders.
//!
//! Renders the [`EncoderSummary`] list returned by
//! [`EncoderRegistry::destroy`](capflow_core::EncoderRegistry::destroy) as a
//! table, one row per encoder plus a total.

use std::io::Write;

use capflow_core::EncoderSummary;
use comfy_table::{Cell, CellAlignment, Table};

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Human-readable byte count, e.g. `1.5 KiB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Build the summary table.
pub fn summary_table(summaries: &[EncoderSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Encoder", "Records", "Size", "Output"]);

    for summary in summaries {
        let output = summary
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(live stream)".to_string());
        table.add_row(vec![
            Cell::new(summary.name),
            Cell::new(summary.records).set_alignment(CellAlignment::Right),
            Cell::new(format_size(summary.size)).set_alignment(CellAlignment::Right),
            Cell::new(output),
        ]);
    }

    let records: u64 = summaries.iter().map(|s| s.records).sum();
    let size: u64 = summaries.iter().map(|s| s.size).sum();
    table.add_row(vec![
        Cell::new("total"),
        Cell::new(records).set_alignment(CellAlignment::Right),
        Cell::new(format_size(size)).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);

    table
}

/// Write the summary table.
pub fn write_summary<W: Write>(summaries: &[EncoderSummary], writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{}", summary_table(summaries))
}

/// Log one line per encoder at info level.
pub fn log_summary(summaries: &[EncoderSummary]) {
    for summary in summaries {
        tracing::info!(
            encoder = summary.name,
            records = summary.records,
            size = summary.size,
            "{}: {} records, {}",
            summary.name,
            summary.records,
            format_size(summary.size)
        );
    }
}
