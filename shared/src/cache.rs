//! Generic key-value cache with a fixed time-to-live.
//!
//! Values are written as JSON envelopes carrying their expiry, so any
//! string store (browser `localStorage`, an in-memory map) can back it.
//! Expired or unreadable entries are dropped lazily on read.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CacheError;

/// Default lifetime of a cached value.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Raw string storage behind a [`CacheService`].
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove_item(&self, key: &str);
}

/// In-process store, used where no browser storage exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    value: T,
    /// Unix milliseconds
    expires_at: i64,
}

pub struct CacheService<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> CacheService<S> {
    pub fn new(store: S, config: &CacheConfig) -> Self {
        let ttl_secs = i64::try_from(config.ttl_secs).unwrap_or(i64::MAX);
        Self {
            store,
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.set_at(key, value, Utc::now())
    }

    pub fn remove(&self, key: &str) {
        self.store.remove_item(key);
    }

    pub(crate) fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let raw = self.store.get_item(key)?;

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) if envelope.expires_at > now.timestamp_millis() => {
                debug!(key, "cache hit");
                Some(envelope.value)
            }
            Ok(_) => {
                debug!(key, "cache entry expired");
                self.store.remove_item(key);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "dropping unreadable cache entry");
                self.store.remove_item(key);
                None
            }
        }
    }

    pub(crate) fn set_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp_millis();

        let raw = serde_json::to_string(&Envelope { value, expires_at }).map_err(|e| {
            CacheError::Serialize {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;

        self.store.set_item(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(ttl_secs: u64) -> CacheService<MemoryStore> {
        CacheService::new(MemoryStore::new(), &CacheConfig { ttl_secs })
    }

    #[test]
    fn test_set_then_get() {
        let cache = service(60);
        cache.set("numbers", &vec![1, 2, 3]).unwrap();
        assert_eq!(cache.get::<Vec<i32>>("numbers"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_key() {
        let cache = service(60);
        assert_eq!(cache.get::<String>("nothing"), None);
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let cache = service(60);
        let written = Utc::now();
        cache.set_at("k", &"v", written).unwrap();

        let before = written + Duration::seconds(59);
        assert_eq!(cache.get_at::<String>("k", before), Some("v".to_string()));

        let after = written + Duration::seconds(61);
        assert_eq!(cache.get_at::<String>("k", after), None);
        assert_eq!(cache.store().get_item("k"), None);
    }

    #[test]
    fn test_unreadable_entry_is_removed() {
        let cache = service(60);
        cache.store().set_item("k", "{not json").unwrap();
        assert_eq!(cache.get::<String>("k"), None);
        assert_eq!(cache.store().get_item("k"), None);
    }

    #[test]
    fn test_envelope_shape() {
        let cache = service(1);
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        cache.set_at("k", &"v", now).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&cache.store().get_item("k").unwrap()).unwrap();
        assert_eq!(raw["value"], "v");
        assert_eq!(raw["expiresAt"], 1_700_000_001_000i64);
    }

    #[test]
    fn test_remove() {
        let cache = service(60);
        cache.set("k", &1).unwrap();
        cache.remove("k");
        assert_eq!(cache.get::<i32>("k"), None);
    }
}
