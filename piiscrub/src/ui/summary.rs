// piiscrub/src/ui/summary.rs
//! Redaction summary table.

use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::{self, Write};

use piiscrub_core::RedactionSummaryItem;

/// Renders the per-kind totals. Sample hashes are not printed; they belong in
/// the JSON report.
pub fn render_summary_table(summary: &[RedactionSummaryItem], unicode: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if unicode { UTF8_FULL } else { ASCII_FULL })
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Kind", "Occurrences", "Heuristic"]);
    for item in summary {
        table.add_row(vec![
            item.kind.clone(),
            item.occurrences.to_string(),
            item.heuristic.to_string(),
        ]);
    }
    table
}

pub fn print_summary<W: Write>(
    summary: &[RedactionSummaryItem],
    writer: &mut W,
    supports_color: bool,
) -> io::Result<()> {
    if summary.is_empty() {
        return writeln!(writer, "No personal data found.");
    }

    let total: usize = summary.iter().map(|s| s.occurrences).sum();
    let title = format!("Redaction summary ({} masked)", total);
    if supports_color {
        writeln!(writer, "{}", title.bold())?;
    } else {
        writeln!(writer, "{}", title)?;
    }
    writeln!(writer, "{}", render_summary_table(summary, supports_color))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: &str, occurrences: usize, heuristic: usize) -> RedactionSummaryItem {
        RedactionSummaryItem {
            kind: kind.to_string(),
            occurrences,
            heuristic,
            sample_hashes: Vec::new(),
        }
    }

    #[test]
    fn test_summary_lists_each_kind() {
        let mut buf = Vec::new();
        print_summary(&[item("email", 2, 0), item("name", 3, 1)], &mut buf, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("Redaction summary (5 masked)"));
        assert!(out.contains("email"));
        assert!(out.contains("name"));
        assert!(out.contains("Heuristic"));
    }

    #[test]
    fn test_empty_summary() {
        let mut buf = Vec::new();
        print_summary(&[], &mut buf, false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No personal data found.\n");
    }
}
