//! Store-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Keys must be non-empty strings
    #[error("Store key must be a non-empty string")]
    InvalidKey,

    /// Failed to read or write the backing file
    #[error("Failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Backing file does not hold a JSON object
    #[error("Failed to (de)serialize store contents: {0}")]
    Serialization(String),
}
