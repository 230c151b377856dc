//! Durable key-value storage for the session mirror.
//!
//! SYSTEM CONTEXT
//! ==============
//! The mirror survives restarts (page reloads in the browser, process
//! restarts in the terminal). Stores are string-only and synchronous so a
//! write completes before the next outbound send.
//!
//! `memory` backs tests, `file` backs the terminal client, and `local`
//! (behind the `hydrate` feature) backs browser builds with `localStorage`.

pub mod file;
#[cfg(feature = "hydrate")]
pub mod local;
pub mod memory;
pub mod mirror;

pub use file::FileStore;
#[cfg(feature = "hydrate")]
pub use local::LocalStorage;
pub use memory::MemoryStore;
pub use mirror::SessionMirror;

/// Error returned by store writes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the value could not be made durable.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the removal could not be made durable.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
