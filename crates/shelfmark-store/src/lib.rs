//! Persistence for the Shelfmark reading journal.
//!
//! [`LibraryStore`] talks to the HTTP backend when one is configured and falls
//! back to a JSON document in local key/value storage when it is not, or when a
//! backend call fails.

pub mod config;
pub mod error;
pub mod local;
pub mod remote;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use error::{RemoteError, RemoteResult, StoreError};
pub use local::{LocalStrategy, STORAGE_KEY};
pub use remote::RemoteStrategy;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::LibraryStore;
