//! Read-through loading of the events list.
//!
//! The loader consults the cache first and only falls back to the remote
//! store on a miss. Store results are expanded, sorted and written back to
//! the cache. Image preloading is left to the caller so it can run detached
//! from the render path.

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheService, KeyValueStore};
use crate::error::FeedError;
use crate::expansion::{expand_collection, image_urls, sort_by_date};
use crate::models::Event;
use crate::store::EventStore;

/// Cache key for the expanded, sorted events list.
pub const EVENTS_CACHE_KEY: &str = "events";

/// What the events view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsState {
    pub events: Vec<Event>,
    pub loading: bool,
    pub error: Option<FeedError>,
}

impl Default for EventsState {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl EventsState {
    pub fn ready(events: Vec<Event>) -> Self {
        Self {
            events,
            loading: false,
            error: None,
        }
    }

    pub fn failed(error: FeedError) -> Self {
        Self {
            events: Vec::new(),
            loading: false,
            error: Some(error),
        }
    }
}

/// Where a load was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Store,
}

/// Outcome of one load: the state to publish and the images to warm.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedLoad {
    pub state: EventsState,
    pub preload: Vec<String>,
    pub source: LoadSource,
}

pub struct EventFeed<'a, S, K> {
    store: &'a S,
    cache: &'a CacheService<K>,
}

impl<'a, S, K> EventFeed<'a, S, K>
where
    S: EventStore,
    K: KeyValueStore,
{
    pub fn new(store: &'a S, cache: &'a CacheService<K>) -> Self {
        Self { store, cache }
    }

    /// Load the events list. Never fails: errors end up in the state.
    pub async fn load(&self, today: NaiveDate) -> FeedLoad {
        if let Some(events) = self.cache.get::<Vec<Event>>(EVENTS_CACHE_KEY) {
            debug!(count = events.len(), "serving events from cache");
            let preload = image_urls(&events);
            return FeedLoad {
                state: EventsState::ready(events),
                preload,
                source: LoadSource::Cache,
            };
        }

        match self.fetch(today).await {
            Ok(events) => {
                info!(count = events.len(), "loaded events from store");
                let preload = image_urls(&events);
                FeedLoad {
                    state: EventsState::ready(events),
                    preload,
                    source: LoadSource::Store,
                }
            }
            Err(e) => {
                error!(error = %e, "failed to load events");
                FeedLoad {
                    state: EventsState::failed(e),
                    preload: Vec::new(),
                    source: LoadSource::Store,
                }
            }
        }
    }

    async fn fetch(&self, today: NaiveDate) -> Result<Vec<Event>, FeedError> {
        let Some(raw) = self.store.fetch_events().await? else {
            debug!("events collection does not exist");
            return Ok(Vec::new());
        };

        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let mut events = expand_collection(&raw, today);
        sort_by_date(&mut events);

        if let Err(e) = self.cache.set(EVENTS_CACHE_KEY, &events) {
            warn!(error = %e, "could not cache events");
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, MemoryStore};
    use crate::error::{CacheError, StoreError};
    use crate::models::EventType;
    use crate::store::{parse_collection, RawCollection};
    use chrono::{Datelike, Weekday};
    use serde_json::{json, Value};
    use std::cell::Cell;

    struct FakeStore {
        response: Result<Value, StoreError>,
        calls: Cell<usize>,
    }

    impl FakeStore {
        fn returning(body: Value) -> Self {
            Self {
                response: Ok(body),
                calls: Cell::new(0),
            }
        }

        fn failing(error: StoreError) -> Self {
            Self {
                response: Err(error),
                calls: Cell::new(0),
            }
        }
    }

    impl EventStore for FakeStore {
        async fn fetch_events(&self) -> Result<Option<RawCollection>, StoreError> {
            self.calls.set(self.calls.get() + 1);
            parse_collection(self.response.clone()?)
        }
    }

    /// Storage whose writes always fail, like a full localStorage.
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<(), CacheError> {
            Err(CacheError::Storage {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }

        fn remove_item(&self, _key: &str) {}
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn cache() -> CacheService<MemoryStore> {
        CacheService::new(MemoryStore::new(), &CacheConfig::default())
    }

    fn ids(state: &EventsState) -> Vec<&str> {
        state.events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = EventsState::default();
        assert!(state.loading);
        assert!(state.events.is_empty());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_store_load_expands_sorts_and_caches() {
        let store = FakeStore::returning(json!({
            "gala": {"title": "Gala", "time": "20:00", "date": "2026-12-31",
                     "imageUrl": "https://cdn.example.com/gala.jpg"},
            "w1": {"title": "Open Mic", "time": "19:00",
                   "imageUrl": "https://cdn.example.com/mic.jpg",
                   "recurrence": {"frequency": "weekly", "dayOfWeek": "Monday"}},
            "early": {"title": "Fair", "time": "10:00", "date": "2026-10-18", "type": "regular"}
        }));
        let cache = cache();

        let load = EventFeed::new(&store, &cache).load(today()).await;

        assert_eq!(load.source, LoadSource::Store);
        assert!(!load.state.loading);
        assert_eq!(load.state.error, None);
        assert_eq!(
            ids(&load.state),
            vec!["early", "w1-0", "w1-1", "w1-2", "w1-3", "gala"]
        );
        assert_eq!(load.state.events[0].event_type, EventType::Regular);
        assert_eq!(
            load.preload,
            vec![
                "https://cdn.example.com/mic.jpg".to_string(),
                "https://cdn.example.com/gala.jpg".to_string(),
            ]
        );

        let cached: Vec<Event> = cache.get(EVENTS_CACHE_KEY).unwrap();
        assert_eq!(cached, load.state.events);
    }

    #[tokio::test]
    async fn test_weekly_template_yields_distinct_mondays() {
        let store = FakeStore::returning(json!({
            "w1": {"title": "Open Mic", "time": "19:00",
                   "recurrence": {"frequency": "weekly", "dayOfWeek": "Monday"}}
        }));
        let cache = cache();

        let load = EventFeed::new(&store, &cache).load(today()).await;
        assert_eq!(ids(&load.state), vec!["w1-0", "w1-1", "w1-2", "w1-3"]);

        let dates: Vec<NaiveDate> = load
            .state
            .events
            .iter()
            .filter_map(Event::parsed_date)
            .collect();
        assert!(dates.iter().all(|d| d.weekday() == Weekday::Mon));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_cache_hit_never_calls_store() {
        let store = FakeStore::returning(json!({"x": {"title": "X", "time": "1"}}));
        let cache = cache();
        let cached = vec![Event {
            id: "cached".to_string(),
            title: "From cache".to_string(),
            time: "12:00".to_string(),
            date: None,
            description: String::new(),
            image_url: Some("https://cdn.example.com/c.jpg".to_string()),
            event_type: EventType::Special,
            recurrence: None,
        }];
        cache.set(EVENTS_CACHE_KEY, &cached).unwrap();

        let load = EventFeed::new(&store, &cache).load(today()).await;

        assert_eq!(store.calls.get(), 0);
        assert_eq!(load.source, LoadSource::Cache);
        assert_eq!(load.state, EventsState::ready(cached));
        assert_eq!(load.preload, vec!["https://cdn.example.com/c.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_second_load_is_served_from_cache() {
        let store = FakeStore::returning(json!({"x": {"title": "X", "time": "1"}}));
        let cache = cache();
        let feed = EventFeed::new(&store, &cache);

        feed.load(today()).await;
        let second = feed.load(today()).await;

        assert_eq!(store.calls.get(), 1);
        assert_eq!(second.source, LoadSource::Cache);
    }

    #[tokio::test]
    async fn test_absent_collection_is_empty() {
        let store = FakeStore::returning(Value::Null);
        let cache = cache();

        let load = EventFeed::new(&store, &cache).load(today()).await;
        assert_eq!(load.state, EventsState::ready(Vec::new()));
        assert!(load.preload.is_empty());
    }

    #[tokio::test]
    async fn test_empty_collection_is_empty() {
        let store = FakeStore::returning(json!({}));
        let cache = cache();

        let load = EventFeed::new(&store, &cache).load(today()).await;
        assert!(load.state.events.is_empty());
        assert!(!load.state.loading);
        assert_eq!(load.state.error, None);
    }

    #[tokio::test]
    async fn test_store_failure_sets_error() {
        let store = FakeStore::failing(StoreError::Request("offline".to_string()));
        let cache = cache();

        let load = EventFeed::new(&store, &cache).load(today()).await;

        assert!(load.state.events.is_empty());
        assert!(!load.state.loading);
        assert_eq!(
            load.state.error,
            Some(FeedError::Store(StoreError::Request("offline".to_string())))
        );
        assert_eq!(cache.get::<Vec<Event>>(EVENTS_CACHE_KEY), None);
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_publishes() {
        let store = FakeStore::returning(json!({"x": {"title": "X", "time": "1"}}));
        let cache = CacheService::new(FullStore, &CacheConfig::default());

        let load = EventFeed::new(&store, &cache).load(today()).await;
        assert_eq!(ids(&load.state), vec!["x"]);
        assert_eq!(load.state.error, None);
    }
}
