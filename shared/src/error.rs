//! Error types for the events section.
//!
//! Every error is `Clone + PartialEq` so it can be held in UI state and
//! compared when props change.

use thiserror::Error;

/// Failure talking to the remote realtime database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status {status}: {status_text}")]
    Status { status: u16, status_text: String },

    #[error("malformed events collection: {0}")]
    Malformed(String),
}

/// Failure writing to the key-value cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("failed to serialize cache entry for `{key}`: {reason}")]
    Serialize { key: String, reason: String },

    #[error("storage rejected write for `{key}`: {reason}")]
    Storage { key: String, reason: String },
}

/// Failure preloading an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image url is empty")]
    EmptyUrl,

    #[error("failed to load image {url}: {reason}")]
    Load { url: String, reason: String },
}

/// Failure surfaced by the events loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("failed to fetch events: {0}")]
    Store(#[from] StoreError),
}
