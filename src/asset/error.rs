//! Asset pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while combining, minifying or linking assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Invalid option combination, raised before any file is touched.
    #[error("invalid link options: {0}")]
    InvalidOptions(String),

    #[error("IO error on `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to minify `{path}`: {message}")]
    Minify { path: PathBuf, message: String },
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
