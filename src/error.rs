//! Errors surfaced by the `battlemap` binary.
//!
//! The engine itself is total; everything here comes from the edges: files,
//! JSON, the environment and user-supplied dice notation.

use std::path::PathBuf;

use board::catalog::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("script line {line}: {message}")]
    Step { line: usize, message: String },

    #[error("invalid dice: {0}")]
    Dice(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
