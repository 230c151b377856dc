//! Browser `localStorage` store for hydrate builds.

use super::{KeyValueStore, StoreError};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's `localStorage`, if the browser exposes one.
    #[must_use]
    pub fn open() -> Option<Self> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("set_item({key}) failed: {e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(format!("remove_item({key}) failed: {e:?}")))
    }
}
