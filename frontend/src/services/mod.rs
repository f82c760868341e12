pub mod database;
pub mod images;
pub mod session;
pub mod storage;

use std::ops::Deref;
use std::rc::Rc;

use events_shared::{CacheService, ImageCache};
use wasm_bindgen::{JsCast, JsValue};
use yew::prelude::*;

use crate::config::FrontendConfig;
use database::RealtimeDatabase;
use images::BrowserImageLoader;
use storage::BrowserStorage;

/// Long-lived clients shared by every component.
pub struct Services {
    pub store: RealtimeDatabase,
    pub cache: CacheService<BrowserStorage>,
    pub images: ImageCache<BrowserImageLoader>,
}

impl Services {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            store: RealtimeDatabase::new(config.database_url.clone(), config.database_auth.clone()),
            cache: CacheService::new(BrowserStorage, &config.cache),
            images: ImageCache::new(BrowserImageLoader),
        }
    }
}

/// Context handle; equality is identity so consumers never re-render on it.
#[derive(Clone)]
pub struct AppServices(pub Rc<Services>);

impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for AppServices {
    type Target = Services;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[hook]
pub fn use_services() -> AppServices {
    use_context::<AppServices>().expect("AppServices context is missing")
}

/// Best-effort text for a JS exception.
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
