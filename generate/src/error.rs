//! Error types for completion and README generation.
//!
//! Every variant is fatal for the current run: the pipeline stops at the
//! first error and earlier writes stay on disk.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The `NAME="..."` assignment was not found in the source text.
    #[error("could not find {variable} in {}", .path.display())]
    HelpTextNotFound { variable: String, path: PathBuf },

    /// A completion or README section template is missing.
    #[error("template not found at {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// File I/O failure on a specific path.
    #[error("{action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results with [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;
