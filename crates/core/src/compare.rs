//! Comparison of a base report against the current report

use crate::data::{MeasurementResult, NormalizedReport};
use crate::format::{format_bytes, format_change, format_line, format_size_change, format_time};
use serde::Serialize;
use std::collections::HashSet;

/// Table header when no timing data is available
pub const SIZE_RESULTS_HEADER: [&str; 2] = ["Path", "Size"];

/// Table header when every current artifact carries timing data
pub const TIME_RESULTS_HEADER: [&str; 5] = [
    "Path",
    "Size",
    "Loading time (3g)",
    "Running time (snapdragon)",
    "Total time",
];

/// Shape of the comparison table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Layout {
    SizeOnly,
    Timing,
}

impl Layout {
    /// Pick the layout for a comparison.
    ///
    /// A single current artifact without timing is enough to drop the timing
    /// columns. Artifacts missing from `current` do not count.
    pub fn detect(current: &NormalizedReport) -> Self {
        if current.iter().any(|r| r.total_time().is_none()) {
            Layout::SizeOnly
        } else {
            Layout::Timing
        }
    }

    pub fn header(&self) -> Vec<String> {
        let header: &[&str] = match self {
            Layout::SizeOnly => &SIZE_RESULTS_HEADER,
            Layout::Timing => &TIME_RESULTS_HEADER,
        };
        header.iter().map(|h| h.to_string()).collect()
    }

    pub fn columns(&self) -> usize {
        match self {
            Layout::SizeOnly => SIZE_RESULTS_HEADER.len(),
            Layout::Timing => TIME_RESULTS_HEADER.len(),
        }
    }
}

/// Artifact names of both reports: base order first, then names only in `current`
pub fn merged_names<'a>(base: &'a NormalizedReport, current: &'a NormalizedReport) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    base.names()
        .chain(current.names())
        .filter(|name| seen.insert(*name))
        .collect()
}

fn format_size_result(name: &str, base: &MeasurementResult, current: &MeasurementResult) -> Vec<String> {
    vec![
        format!("`{}`", name),
        format_line(
            &format_bytes(current.size),
            &format_size_change(base.size, current.size),
        ),
    ]
}

fn format_time_result(name: &str, base: &MeasurementResult, current: &MeasurementResult) -> Vec<String> {
    let mut row = format_size_result(name, base, current);

    let current_loading = current.loading_time().unwrap_or_default();
    let current_running = current.running_time().unwrap_or_default();

    row.push(format_line(
        &format_time(current_loading),
        &format_change(base.loading_time().unwrap_or_default(), current_loading),
    ));
    row.push(format_line(
        &format_time(current_running),
        &format_change(base.running_time().unwrap_or_default(), current_running),
    ));
    row.push(format_time(current.total_time().unwrap_or_default()));

    row
}

/// Build the comparison table: the header row followed by one row per artifact
pub fn format_results(base: &NormalizedReport, current: &NormalizedReport) -> Vec<Vec<String>> {
    let layout = Layout::detect(current);
    let empty = MeasurementResult::empty();

    let mut table = vec![layout.header()];

    for name in merged_names(base, current) {
        let base_result = base.get(name).unwrap_or(&empty);
        let current_result = current.get(name).unwrap_or(&empty);

        let row = match layout {
            Layout::SizeOnly => format_size_result(name, base_result, current_result),
            Layout::Timing => format_time_result(name, base_result, current_result),
        };
        table.push(row);
    }

    table
}

/// Aggregate view of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub layout: Layout,
    /// Artifacts only in the current report
    pub added: Vec<String>,
    /// Artifacts only in the base report
    pub removed: Vec<String>,
    /// Artifacts in both reports whose size changed
    pub changed: Vec<String>,
    pub base_total_size: f64,
    pub current_total_size: f64,
}

impl ComparisonSummary {
    pub fn size_delta(&self) -> f64 {
        self.current_total_size - self.base_total_size
    }

    /// One line description, e.g. `3 artifact(s), 12.5 kB (+200 B 🔺)`
    pub fn short_summary(&self, artifacts: usize) -> String {
        format!(
            "{} artifact(s), {}",
            artifacts,
            format_line(
                &format_bytes(self.current_total_size),
                &format_size_change(self.base_total_size, self.current_total_size),
            )
        )
    }
}

/// Summarize the differences between two reports
pub fn summarize(base: &NormalizedReport, current: &NormalizedReport) -> ComparisonSummary {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut changed = Vec::new();

    for name in merged_names(base, current) {
        match (base.get(name), current.get(name)) {
            (Some(b), Some(c)) if b.size != c.size => changed.push(name.to_string()),
            (None, Some(_)) => added.push(name.to_string()),
            (Some(_), None) => removed.push(name.to_string()),
            _ => {}
        }
    }

    ComparisonSummary {
        layout: Layout::detect(current),
        added,
        removed,
        changed,
        base_total_size: base.total_size(),
        current_total_size: current.total_size(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report(results: Vec<MeasurementResult>) -> NormalizedReport {
        results.into_iter().collect()
    }

    #[test]
    fn test_size_only_increase() {
        let base = report(vec![MeasurementResult::new("bundle.js", 1000.0)]);
        let current = report(vec![MeasurementResult::new("bundle.js", 1200.0)]);

        let table = format_results(&base, &current);

        assert_eq!(
            table,
            vec![
                vec!["Path".to_string(), "Size".to_string()],
                vec!["`bundle.js`".to_string(), "1.2 kB (+200 B 🔺)".to_string()],
            ]
        );
    }

    #[test]
    fn test_added_artifact() {
        let base = NormalizedReport::new();
        let current = report(vec![MeasurementResult::new("new.js", 500.0)]);

        let table = format_results(&base, &current);

        assert_eq!(table.len(), 2);
        assert_eq!(table[0], vec!["Path", "Size"]);
        assert_eq!(table[1], vec!["`new.js`", "500 B (+500 B 🔺)"]);
    }

    #[test]
    fn test_removed_artifact() {
        let base = report(vec![MeasurementResult::new("old.js", 300.0)]);
        let current = NormalizedReport::new();

        let table = format_results(&base, &current);

        // Nothing in current lacks timing, so the timing layout is kept
        assert_eq!(table[0].len(), TIME_RESULTS_HEADER.len());
        assert_eq!(table[1][0], "`old.js`");
        assert_eq!(table[1][1], "0 B (-300 B 🔽)");
    }

    #[test]
    fn test_removed_artifact_with_size_only_current() {
        let base = report(vec![
            MeasurementResult::new("kept.js", 100.0),
            MeasurementResult::new("old.js", 300.0),
        ]);
        let current = report(vec![MeasurementResult::new("kept.js", 100.0)]);

        let table = format_results(&base, &current);

        assert_eq!(
            table,
            vec![
                vec!["Path", "Size"],
                vec!["`kept.js`", "100 B"],
                vec!["`old.js`", "0 B (-300 B 🔽)"],
            ]
        );
    }

    #[test]
    fn test_timing_layout() {
        let base = report(vec![MeasurementResult::with_timing(
            "index.js", 2000.0, 0.04, 0.1,
        )]);
        let current = report(vec![MeasurementResult::with_timing(
            "index.js", 1000.0, 0.02, 0.15,
        )]);

        let table = format_results(&base, &current);

        assert_eq!(
            table,
            vec![
                vec![
                    "Path",
                    "Size",
                    "Loading time (3g)",
                    "Running time (snapdragon)",
                    "Total time"
                ],
                vec![
                    "`index.js`",
                    "1 kB (-1 kB 🔽)",
                    "20 ms (-50% 🔽)",
                    "150 ms (+50% 🔺)",
                    "170 ms"
                ],
            ]
        );
    }

    #[test]
    fn test_timing_against_size_only_base() {
        let base = report(vec![MeasurementResult::new("index.js", 1000.0)]);
        let current = report(vec![MeasurementResult::with_timing(
            "index.js", 1000.0, 1.5, 0.5,
        )]);

        let table = format_results(&base, &current);

        assert_eq!(
            table[1],
            vec![
                "`index.js`",
                "1 kB",
                "1.5 s (+100% 🔺)",
                "500 ms (+100% 🔺)",
                "2 s"
            ]
        );
    }

    #[test]
    fn test_one_untimed_artifact_forces_size_only() {
        let current = report(vec![
            MeasurementResult::with_timing("a.js", 10.0, 0.1, 0.1),
            MeasurementResult::new("b.js", 10.0),
        ]);

        assert_eq!(Layout::detect(&current), Layout::SizeOnly);

        let table = format_results(&current, &current);
        assert!(table.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_same_report_has_no_changes() {
        let sizes = report(vec![
            MeasurementResult::new("a.js", 10.0),
            MeasurementResult::new("b.js", 2_000.0),
        ]);
        for row in &format_results(&sizes, &sizes)[1..] {
            assert!(!row[1].contains('('));
        }

        let timed = report(vec![
            MeasurementResult::with_timing("a.js", 10.0, 0.1, 0.2),
            MeasurementResult::with_timing("b.js", 2_000.0, 1.2, 0.3),
        ]);
        for row in &format_results(&timed, &timed)[1..] {
            assert!(!row[1].contains('('));
            for cell in &row[2..4] {
                assert!(cell.ends_with("(0%)"), "unexpected cell {}", cell);
                assert!(!cell.contains(crate::format::INCREASE));
                assert!(!cell.contains(crate::format::DECREASE));
            }
        }
    }

    #[test]
    fn test_merged_names_order() {
        let base = report(vec![
            MeasurementResult::new("b", 1.0),
            MeasurementResult::new("a", 1.0),
        ]);
        let current = report(vec![
            MeasurementResult::new("c", 1.0),
            MeasurementResult::new("a", 1.0),
            MeasurementResult::new("d", 1.0),
        ]);

        assert_eq!(merged_names(&base, &current), vec!["b", "a", "c", "d"]);

        let table = format_results(&base, &current);
        assert_eq!(table.len(), 5);
        assert!(table.iter().all(|row| row.len() == Layout::SizeOnly.columns()));
    }

    #[test]
    fn test_summarize() {
        let base = report(vec![
            MeasurementResult::new("same.js", 100.0),
            MeasurementResult::new("grown.js", 100.0),
            MeasurementResult::new("gone.js", 50.0),
        ]);
        let current = report(vec![
            MeasurementResult::new("same.js", 100.0),
            MeasurementResult::new("grown.js", 400.0),
            MeasurementResult::new("fresh.js", 25.0),
        ]);

        let summary = summarize(&base, &current);

        assert_eq!(summary.layout, Layout::SizeOnly);
        assert_eq!(summary.added, vec!["fresh.js"]);
        assert_eq!(summary.removed, vec!["gone.js"]);
        assert_eq!(summary.changed, vec!["grown.js"]);
        assert_eq!(summary.size_delta(), 275.0);
        assert_eq!(summary.short_summary(4), "4 artifact(s), 525 B (+275 B 🔺)");
    }
}
