use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the K-stat dashboard.
#[derive(Error, Debug)]
pub enum KstatError {
    /// The source export does not exist at the given path.
    #[error("Source file not found: {0:?}")]
    FileNotFound(PathBuf),

    /// The byte stream could not be interpreted under the configured encoding.
    #[error("Failed to decode {path:?} as {encoding}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// A required column is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell in a numeric column did not parse after cleaning.
    #[error("Column {column:?} holds unparseable value {raw:?}")]
    ColumnCoercion { column: String, raw: String },

    /// Malformed delimited text (ragged row, unterminated quote, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, KstatError>;
