//! Domain logic for the events section, independent of the browser.

pub mod cache;
pub mod error;
pub mod expansion;
pub mod feed;
pub mod images;
pub mod models;
pub mod occurrence;
pub mod store;

pub use cache::{CacheConfig, CacheService, KeyValueStore, MemoryStore};
pub use error::{CacheError, FeedError, ImageError, StoreError};
pub use feed::{EventFeed, EventsState, FeedLoad, LoadSource, EVENTS_CACHE_KEY};
pub use images::{ImageCache, ImageLoader};
pub use models::{DayOfWeek, Event, EventDraft, EventRecord, EventType, Frequency, Recurrence};
pub use store::{EventStore, RawCollection};
