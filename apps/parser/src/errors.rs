use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the edges around the parser: loading documents and
/// persisting the header cache. The parsing core itself never fails.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed for '{path}': {message}")]
    PdfExtraction { path: PathBuf, message: String },

    #[error("Header cache is corrupt: {0}")]
    CacheFormat(#[from] serde_json::Error),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}
