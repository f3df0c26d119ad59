//! Error types for tabkit

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or rendering a table
#[derive(Error, Debug)]
pub enum TabkitError {
    /// Malformed or empty configuration (column spec, dataset shape, spanners, export options)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A column spec or spanner references a column that does not exist
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// A footnote points at a cell outside the rendered table
    #[error("invalid footnote target (column '{column}', row {row:?}): {reason}")]
    FootnoteTarget {
        column: String,
        row: Option<usize>,
        reason: String,
    },

    /// JSON configuration could not be parsed
    #[error("failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// An exporter could not produce its output
    #[error("export failed: {0}")]
    Export(String),

    /// Failed to read a configuration file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TabkitError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        TabkitError::Configuration(message.into())
    }

    pub(crate) fn unknown_column(column: impl Into<String>) -> Self {
        TabkitError::UnknownColumn {
            column: column.into(),
        }
    }
}

impl From<serde_json::Error> for TabkitError {
    fn from(err: serde_json::Error) -> Self {
        TabkitError::ConfigParse {
            message: err.to_string(),
        }
    }
}
