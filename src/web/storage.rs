//! `localStorage`-backed preference store

use tracing::debug;
use web_sys::{Storage, Window};

use crate::core::PreferenceStore;
use crate::error::FxError;

/// Holds `None` when storage is disabled (private mode, sandboxed iframe)
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            debug!("localStorage unavailable, theme will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), FxError> {
        let Some(storage) = &self.storage else {
            return Err(FxError::Storage("localStorage unavailable".to_string()));
        };
        storage
            .set_item(key, value)
            .map_err(|e| FxError::Storage(format!("{e:?}")))
    }
}
