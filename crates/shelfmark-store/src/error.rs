use reqwest::StatusCode;
use shelfmark_core::ShelfError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the library store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ShelfError),

    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Persisted data exists but does not decode into the entity model
    #[error("Corrupted local data under '{key}': {source}")]
    Corrupted {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// Why a remote call did not produce a usable result.
///
/// Never shown to users for book, chapter or note operations: the store logs it
/// and continues with local storage.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Base URL cannot carry a path: {0}")]
    InvalidBase(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;
