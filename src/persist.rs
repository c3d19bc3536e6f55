//! Key-value persistence behind the placement store.
//!
//! The browser build talks to `window.localStorage`; tests and browsers without
//! storage use [`MemoryStorage`]. Callers only see [`PersistenceAdapter`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no storage backend available")]
    Unavailable,
    #[error("failed to read {key}: {message}")]
    Read { key: String, message: String },
    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },
    #[error("value stored under {key} is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait PersistenceAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        (**self).set(key, value)
    }
}

/// Shared handle to the active backend; equal when both point at the same store.
#[derive(Clone)]
pub struct SharedStorage(pub Rc<dyn PersistenceAdapter>);

impl SharedStorage {
    /// localStorage when the page has it, otherwise an in-memory store for this visit.
    pub fn detect() -> Self {
        if BrowserStorage::available() {
            Self(Rc::new(BrowserStorage))
        } else {
            tracing::warn!("localStorage unavailable, temple changes will not be kept");
            Self(Rc::new(MemoryStorage::default()))
        }
    }
}

impl PartialEq for SharedStorage {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

/// Reads and decodes the JSON value stored under `key`.
pub fn read_json<T: serde::de::DeserializeOwned>(
    storage: &dyn PersistenceAdapter,
    key: &str,
) -> Result<Option<T>, PersistError> {
    match storage.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| PersistError::Malformed {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub fn write_json<T: serde::Serialize>(
    storage: &dyn PersistenceAdapter,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let raw = serde_json::to_string(value).map_err(|e| PersistError::Write {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    storage.set(key, &raw)
}

/// `window.localStorage`, resolved on every call so a revoked storage is noticed.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// Whether the current page exposes localStorage at all.
    pub fn available() -> bool {
        Self::storage().is_ok()
    }

    fn storage() -> Result<web_sys::Storage, PersistError> {
        let win = web_sys::window().ok_or(PersistError::Unavailable)?;
        match win.local_storage() {
            Ok(Some(store)) => Ok(store),
            _ => Err(PersistError::Unavailable),
        }
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl PersistenceAdapter for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| PersistError::Read {
                key: key.to_string(),
                message: js_message(&e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| PersistError::Write {
                key: key.to_string(),
                message: js_message(&e),
            })
    }
}

/// In-memory store. Counts writes and can be told to fail, for exercising recovery paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        if self.fail_reads.get() {
            return Err(PersistError::Read {
                key: key.to_string(),
                message: "read refused".to_string(),
            });
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(PersistError::Write {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_json_reports_malformed_values() {
        let storage = MemoryStorage::default();
        storage.set("k", "[1,2").unwrap();
        let err = read_json::<Vec<u32>>(&storage, "k").unwrap_err();
        assert!(matches!(err, PersistError::Malformed { ref key, .. } if key == "k"));
        assert!(read_json::<Vec<u32>>(&storage, "missing").unwrap().is_none());
    }

    #[test]
    fn write_json_round_trips_through_memory() {
        let storage = MemoryStorage::default();
        write_json(&storage, "k", &vec![1u32, 2]).unwrap();
        assert_eq!(storage.raw("k").as_deref(), Some("[1,2]"));
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn failing_writes_are_counted_but_not_stored() {
        let storage = MemoryStorage::default();
        storage.set_fail_writes(true);
        assert!(storage.set("k", "v").is_err());
        assert_eq!(storage.writes(), 1);
        assert!(storage.raw("k").is_none());
    }

    #[test]
    fn rc_adapter_delegates() {
        let storage = Rc::new(MemoryStorage::default());
        let shared: Rc<dyn PersistenceAdapter> = storage.clone();
        shared.set("k", "v").unwrap();
        assert_eq!(storage.raw("k").as_deref(), Some("v"));
    }
}
