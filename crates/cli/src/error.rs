//! Error types for the size-report CLI

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// CLI-specific error types (includes native dependencies)
#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Creating or updating a comment failed; forks usually lack the permission
    #[error("Failed to write comment: {0}")]
    CommentWrite(Box<Error>),

    #[error("Command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}
