use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{check_key, KeyValueStorage};
use crate::error::StoreError;

/// In-process storage for tests and ephemeral sessions.
///
/// Clones share the same map, so a clone can be used to inspect what a store
/// wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        Ok(self.items().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        check_key(key)?;
        self.items().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.items().remove(key);
        Ok(())
    }
}
