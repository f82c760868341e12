//! Remembers which image URLs the browser has already fetched.

use std::cell::RefCell;
use std::collections::HashSet;

use futures_util::future::join_all;
use tracing::debug;

use crate::error::ImageError;

/// Fetches an image so that later `<img>` tags hit the browser cache.
#[allow(async_fn_in_trait)]
pub trait ImageLoader {
    async fn load(&self, url: &str) -> Result<(), ImageError>;
}

pub struct ImageCache<L> {
    loader: L,
    loaded: RefCell<HashSet<String>>,
}

impl<L: ImageLoader> ImageCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            loaded: RefCell::new(HashSet::new()),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn has_image(&self, url: &str) -> bool {
        self.loaded.borrow().contains(url)
    }

    /// Load a single image. Already loaded URLs return without touching
    /// the loader.
    pub async fn preload_image(&self, url: &str) -> Result<(), ImageError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ImageError::EmptyUrl);
        }
        if self.has_image(url) {
            return Ok(());
        }

        self.loader.load(url).await?;
        debug!(url, "image preloaded");
        self.loaded.borrow_mut().insert(url.to_string());
        Ok(())
    }

    /// Load a batch concurrently, skipping blank, duplicate and known URLs.
    ///
    /// Every load is allowed to settle; the first failure is returned.
    pub async fn preload_images<I, S>(&self, urls: I) -> Result<(), ImageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let pending: Vec<String> = urls
            .into_iter()
            .map(|url| url.as_ref().trim().to_string())
            .filter(|url| !url.is_empty() && !self.has_image(url))
            .filter(|url| seen.insert(url.clone()))
            .collect();

        let results = join_all(pending.iter().map(|url| self.preload_image(url))).await;
        results.into_iter().find_map(Result::err).map_or(Ok(()), Err)
    }
}
