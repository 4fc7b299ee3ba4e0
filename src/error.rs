//! Error types for catalog loading.
//!
//! Loading is the only fallible stage of the pipeline; filtering and insight
//! selection are total. Binaries wrap [`CatalogError`] with `anyhow` context.

use std::path::PathBuf;

/// Fatal failure while reading a catalog export. No partial catalog is ever
/// returned alongside one of these.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The export could not be opened or read.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The CSV stream itself is malformed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column the enricher needs.
    #[error("required column {0:?} missing from catalog header")]
    MissingColumn(&'static str),

    /// The export has no header row at all.
    #[error("catalog export has no header row")]
    EmptyHeader,
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
