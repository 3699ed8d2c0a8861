//! Persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from either sink.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure on the output file or its directory.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The collection could not be encoded or the file could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema creation failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A connection string the store cannot open.
    #[error("Invalid database URL '{0}'")]
    InvalidUrl(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
