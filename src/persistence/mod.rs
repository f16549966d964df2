//! Session-scoped key-value persistence
//!
//! Features:
//! - `SessionStore` abstraction over string key-value stores
//! - In-memory backend for native builds and tests
//! - `window.sessionStorage` backend for the browser build
//! - JSON helpers shared by settings and tournaments

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// String key-value store scoped to one browsing session
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str);
}

/// Process-local store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser `sessionStorage` (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct BrowserSessionStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserSessionStore {
    /// Returns `None` when session storage is unavailable (e.g. sandboxed iframe)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.session_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("set_item({}) failed: {:?}", key, e)))
    }

    fn remove(&mut self, key: &str) {
        if self.storage.remove_item(key).is_err() {
            log::warn!("sessionStorage.removeItem({}) failed", key);
        }
    }
}

/// Serialize `value` as JSON under `key`
pub fn save_json<T: Serialize>(store: &mut dyn SessionStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Read and deserialize the JSON stored under `key`.
///
/// `Ok(None)` when the key is absent; an error when the blob is corrupt.
pub fn load_json<T: DeserializeOwned>(store: &dyn SessionStore, key: &str) -> Result<Option<T>> {
    match store.get(key) {
        Some(json) => serde_json::from_str(&json).map(Some).map_err(Error::from),
        None => Ok(None),
    }
}
