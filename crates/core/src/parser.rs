//! Parser for `size-limit --json` output
//!
//! size-limit prints a JSON array with one object per configured check:
//! ```text
//! [
//!   { "name": "dist/index.js", "passed": true, "size": 1203 },
//!   { "name": "dist/lazy.js", "passed": true, "size": "530", "loading": 0.01, "running": 0.12 }
//! ]
//! ```
//!
//! `loading` and `running` only appear when `@size-limit/time` is installed.
//! A `null` value counts as present and reads as 0.

use crate::data::{MeasurementResult, NormalizedReport};
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One element of the size-limit array before numeric coercion
#[derive(Debug, Deserialize)]
struct RawResult {
    name: String,
    size: Value,
    #[serde(default, deserialize_with = "present")]
    loading: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    running: Option<Value>,
}

/// `None` only when the key is missing; an explicit `null` stays `Some(Value::Null)`
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RawResult {
    fn into_result(self) -> Result<MeasurementResult> {
        let size = coerce_number(&self.size, &self.name, "size")?;

        let result = match (&self.loading, &self.running) {
            (Some(loading), Some(running)) => {
                let loading = coerce_number(loading, &self.name, "loading")?;
                let running = coerce_number(running, &self.name, "running")?;
                MeasurementResult::with_timing(self.name, size, loading, running)
            }
            _ => MeasurementResult::new(self.name, size),
        };

        Ok(result)
    }
}

/// Accept a JSON number, a numeric string or `null` (as 0); anything else is rejected
fn coerce_number(value: &Value, artifact: &str, field: &'static str) -> Result<f64> {
    let number = match value {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(Error::InvalidField {
            artifact: artifact.to_string(),
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse size-limit output from a string
pub fn parse_from_string(output: &str) -> Result<NormalizedReport> {
    let value: Value = serde_json::from_str(output)?;

    if !value.is_array() {
        return Err(Error::InvalidShape(format!(
            "expected a JSON array, found {}",
            json_kind(&value)
        )));
    }

    let raw: Vec<RawResult> = serde_json::from_value(value)?;

    raw.into_iter().map(RawResult::into_result).collect()
}

/// Parse size-limit output from a file
pub fn parse_from_file(path: &std::path::Path) -> Result<NormalizedReport> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_from_string(&content)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
