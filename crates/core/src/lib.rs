//! size-report-core - Comparison engine for size-limit reports
//!
//! This crate turns two `size-limit --json` outputs (base branch and pull
//! request head) into a markdown comparison table. It performs no process
//! execution or network I/O.
//!
//! # Example
//!
//! ```
//! use size_report_core::{parse_from_string, render_report};
//!
//! let base = parse_from_string(r#"[{"name":"bundle.js","size":1000}]"#).unwrap();
//! let current = parse_from_string(r#"[{"name":"bundle.js","size":1200}]"#).unwrap();
//!
//! let body = render_report(&base, &current);
//! assert!(body.contains("1.2 kB (+200 B 🔺)"));
//! ```

pub mod compare;
pub mod data;
pub mod error;
pub mod format;
pub mod markdown;
pub mod parser;

pub use compare::{format_results, summarize, ComparisonSummary, Layout};
pub use data::{MeasurementResult, NormalizedReport, Timing};
pub use error::{Error, Result};
pub use markdown::{is_report, render_report, render_table, REPORT_HEADING};
pub use parser::{parse_from_file, parse_from_string};
