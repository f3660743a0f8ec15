//! Durable key/value blob storage.
//!
//! The local strategy keeps the whole library under a single key, the same way
//! a browser app would use `localStorage`. [`FileStorage`] writes one file per
//! key under a data directory; [`MemoryStorage`] keeps everything in process and
//! is what the tests use.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::future::Future;

use crate::error::StoreError;

/// Async string storage addressed by key
pub trait KeyValueStorage: Send + Sync {
    /// `None` when nothing has been stored under `key`
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn set_item(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Keys become file names, so keep them to a conservative alphabet
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
