//! Data structures for size-limit measurements

use serde::Serialize;
use std::collections::HashMap;

/// Timing measured by `@size-limit/time`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct Timing {
    /// Loading time on a slow 3G connection, in seconds
    pub loading: f64,
    /// Running time on a low-end phone, in seconds
    pub running: f64,
}

impl Timing {
    pub fn total(&self) -> f64 {
        self.loading + self.running
    }
}

/// A single artifact measurement
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeasurementResult {
    /// Name of the measured artifact
    pub name: String,
    /// Size in bytes
    pub size: f64,
    /// Present only when the time plugin is installed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}

impl MeasurementResult {
    /// Create a size-only measurement
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
            timing: None,
        }
    }

    /// Create a measurement carrying loading and running time
    pub fn with_timing(name: impl Into<String>, size: f64, loading: f64, running: f64) -> Self {
        Self {
            name: name.into(),
            size,
            timing: Some(Timing { loading, running }),
        }
    }

    /// Placeholder substituted for an artifact missing from one side of a comparison.
    ///
    /// All values are zero, including timing, so a missing artifact never forces the
    /// size-only layout by itself.
    pub fn empty() -> Self {
        Self::with_timing("-", 0.0, 0.0, 0.0)
    }

    pub fn loading_time(&self) -> Option<f64> {
        self.timing.map(|t| t.loading)
    }

    pub fn running_time(&self) -> Option<f64> {
        self.timing.map(|t| t.running)
    }

    /// Sum of loading and running time, present iff timing was measured
    pub fn total_time(&self) -> Option<f64> {
        self.timing.map(|t| t.total())
    }
}

/// Measurements of one size-limit run, keyed by artifact name.
///
/// Iteration follows first-insertion order. Inserting an existing name replaces the
/// stored result but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedReport {
    results: Vec<MeasurementResult>,
    index: HashMap<String, usize>,
}

impl NormalizedReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, replacing any earlier result with the same name
    pub fn insert(&mut self, result: MeasurementResult) {
        match self.index.get(&result.name) {
            Some(&pos) => self.results[pos] = result,
            None => {
                self.index.insert(result.name.clone(), self.results.len());
                self.results.push(result);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MeasurementResult> {
        self.index.get(name).map(|&pos| &self.results[pos])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeasurementResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Total size of all artifacts in bytes
    pub fn total_size(&self) -> f64 {
        self.results.iter().map(|r| r.size).sum()
    }
}

impl FromIterator<MeasurementResult> for NormalizedReport {
    fn from_iter<I: IntoIterator<Item = MeasurementResult>>(iter: I) -> Self {
        let mut report = Self::new();
        for result in iter {
            report.insert(result);
        }
        report
    }
}
