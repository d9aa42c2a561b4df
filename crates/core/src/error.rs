//! Error types for size-report-core

use thiserror::Error;

/// Result type alias for size-report-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or decoding size-limit output
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected size-limit output: {0}")]
    InvalidShape(String),

    #[error("Invalid value for `{field}` of `{artifact}`: {value}")]
    InvalidField {
        artifact: String,
        field: &'static str,
        value: String,
    },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
