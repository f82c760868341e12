use events_shared::{CacheError, KeyValueStore};
use gloo::storage::{LocalStorage, Storage};

use super::js_error_message;

/// `localStorage`-backed store for the cache service.
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| CacheError::Storage {
                key: key.to_string(),
                reason: js_error_message(&e),
            })
    }

    fn remove_item(&self, key: &str) {
        if let Err(e) = LocalStorage::raw().remove_item(key) {
            tracing::warn!("Failed to remove {} from storage: {}", key, js_error_message(&e));
        }
    }
}
