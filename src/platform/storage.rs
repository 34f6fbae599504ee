//! Storage backends and the shared store handle
//!
//! The app opens its store once, on first use, and reuses that handle for
//! the rest of the page's life. On the web it sits on `window.localStorage`;
//! natively each thread gets its own in-memory store.

use std::cell::{OnceCell, RefCell};

#[cfg(not(target_arch = "wasm32"))]
use super::MemoryBackend;
#[cfg(target_arch = "wasm32")]
use super::StorageBackend;
use crate::store::{Store, StoreError};

/// LocalStorage-backed key-value storage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageBackend {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    pub fn open() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl std::fmt::Debug for LocalStorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LocalStorageBackend")
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Quota errors land here
        self.storage.set_item(key, value).map_err(js_error)
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Unavailable(format!("{:?}", err))
}

/// Backend behind the shared store
#[cfg(target_arch = "wasm32")]
pub type SharedBackend = LocalStorageBackend;

/// Backend behind the shared store
#[cfg(not(target_arch = "wasm32"))]
pub type SharedBackend = MemoryBackend;

/// A fresh handle on the platform's key-value storage
#[cfg(target_arch = "wasm32")]
pub fn open_backend() -> Result<SharedBackend, StoreError> {
    LocalStorageBackend::open()
}

/// A fresh handle on the platform's key-value storage
#[cfg(not(target_arch = "wasm32"))]
pub fn open_backend() -> Result<SharedBackend, StoreError> {
    Ok(MemoryBackend::new())
}

thread_local! {
    static SHARED: OnceCell<RefCell<Store<SharedBackend>>> = const { OnceCell::new() };
}

/// Run `f` against the shared store, opening it on first use.
///
/// A failed open is not cached; the next call tries again. `f` must not
/// call `with_store` itself.
pub fn with_store<R>(
    f: impl FnOnce(&mut Store<SharedBackend>) -> Result<R, StoreError>,
) -> Result<R, StoreError> {
    SHARED.with(|cell| {
        if cell.get().is_none() {
            let store = Store::open(open_backend()?)?;
            let _ = cell.set(RefCell::new(store));
        }
        let store = cell
            .get()
            .ok_or_else(|| StoreError::Unavailable("store not initialized".to_string()))?;
        let mut store = store.borrow_mut();
        f(&mut store)
    })
}

/// Swap the calling thread's shared store for an empty one
#[cfg(test)]
pub(crate) fn reset_shared_store() {
    SHARED.with(|cell| {
        if let Some(store) = cell.get() {
            if let Ok(fresh) = Store::open(MemoryBackend::new()) {
                *store.borrow_mut() = fresh;
            }
        }
    });
}
