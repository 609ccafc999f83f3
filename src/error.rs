use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a rewrite run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV must contain columns [\"file_name\", \"transcription\"]; got {found:?}")]
    MissingColumns { found: Vec<String> },

    #[error("CSV header repeats column {name:?}; got {found:?}")]
    DuplicateColumn { name: String, found: Vec<String> },

    #[error("Input CSV not found or unreadable: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input row at line {line}")]
    MalformedRow {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write output CSV {}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot express {path} relative to {base}")]
    PathFallback { path: String, base: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn output(path: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        Self::OutputWriteFailure {
            path: path.into(),
            source: source.into(),
        }
    }
}
