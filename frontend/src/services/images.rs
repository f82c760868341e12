use events_shared::{ImageError, ImageLoader};
use js_sys::Promise;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use super::js_error_message;

/// Loads images through a detached `<img>` so the browser caches them.
pub struct BrowserImageLoader;

impl ImageLoader for BrowserImageLoader {
    async fn load(&self, url: &str) -> Result<(), ImageError> {
        let failed = |reason: String| ImageError::Load {
            url: url.to_string(),
            reason,
        };

        let image = HtmlImageElement::new().map_err(|e| failed(js_error_message(&e)))?;
        let settled = Promise::new(&mut |resolve, reject| {
            image.set_onload(Some(&resolve));
            image.set_onerror(Some(&reject));
        });
        image.set_src(url);

        let result = JsFuture::from(settled).await;
        image.set_onload(None);
        image.set_onerror(None);

        result
            .map(|_| ())
            .map_err(|_| failed("browser could not load the image".to_string()))
    }
}
