use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load the morphological dictionary: {0}")]
    Dictionary(String),

    #[error("failed to access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid merge rule: {0}")]
    MergeRule(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("file not found: {0}")]
    MissingFile(PathBuf),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
