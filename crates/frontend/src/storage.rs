//! `localStorage` and `document.cookie` as a session store

use courier_core::SessionStore;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage};

/// Session storage of the current page
pub struct BrowserStore {
    storage: Option<Storage>,
    document: Option<HtmlDocument>,
}

impl BrowserStore {
    pub fn new() -> Self {
        let window = web_sys::window();
        let storage = window
            .as_ref()
            .and_then(|w| w.local_storage().ok().flatten());
        let document = window
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok());

        if storage.is_none() {
            warn!("localStorage unavailable, session will not persist");
        }

        Self { storage, document }
    }
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for BrowserStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage
            && let Err(e) = storage.set_item(key, value)
        {
            warn!(key, error = ?e, "failed to write localStorage");
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = &self.storage
            && let Err(e) = storage.remove_item(key)
        {
            warn!(key, error = ?e, "failed to remove from localStorage");
        }
    }

    fn cookie_string(&self) -> Option<String> {
        self.document.as_ref()?.cookie().ok()
    }
}
