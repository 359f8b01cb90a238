use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the study dashboard core.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the source header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A field on a data row could not be parsed.
    #[error("Format error on line {line}: {message}")]
    Format { line: u64, message: String },

    /// A record violates a data-model invariant.
    #[error("Invalid record on line {line} (module {module_id}): {message}")]
    Validation {
        line: u64,
        module_id: String,
        message: String,
    },

    /// Several records violate invariants (collect-all validation policy).
    #[error("{} invalid records:\n{}", .0.len(), format_batch(.0))]
    ValidationBatch(Vec<DashboardError>),

    /// Pass-through for errors raised by the CSV parser itself.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

fn format_batch(errors: &[DashboardError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
