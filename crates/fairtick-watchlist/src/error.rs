use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting a watchlist.
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("watchlist I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("watchlist serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WatchlistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
