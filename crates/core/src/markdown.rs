//! Markdown rendering of comparison tables

use crate::compare::format_results;
use crate::data::NormalizedReport;

/// Heading that starts every report comment.
///
/// Publishers look for it to update an earlier report instead of adding a new one.
pub const REPORT_HEADING: &str = "## size-limit report 📦 ";

const MIN_COLUMN_WIDTH: usize = 3;

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}

/// Render rows as a GitHub markdown table. The first row is the header.
///
/// Cells are left aligned and padded so columns line up in plain text too.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let Some(header) = rows.first() else {
        return String::new();
    };

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0).max(header.len());
    let mut widths = vec![MIN_COLUMN_WIDTH; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell_width(cell));
        }
    }

    let render_row = |row: &[String]| -> String {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let padding = width - cell_width(cell);
                format!("{}{}", cell, " ".repeat(padding))
            })
            .collect();
        format!("| {} |", cells.join(" | "))
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_row(header.as_slice()));

    let delimiter: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    lines.push(format!("| {} |", delimiter.join(" | ")));

    for row in &rows[1..] {
        lines.push(render_row(row.as_slice()));
    }

    lines.join("\n")
}

/// Render the full comment body comparing `base` with `current`
pub fn render_report(base: &NormalizedReport, current: &NormalizedReport) -> String {
    [
        REPORT_HEADING.to_string(),
        render_table(&format_results(base, current)),
    ]
    .join("\r\n")
}

/// Check whether a comment body is a report produced by [`render_report`]
pub fn is_report(body: &str) -> bool {
    body.starts_with(REPORT_HEADING)
}
