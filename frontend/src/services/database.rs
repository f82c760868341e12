use events_shared::store::{parse_collection, EVENTS_PATH};
use events_shared::{EventStore, RawCollection, StoreError};
use gloo_net::http::Request;

/// REST client for the hosted realtime database.
pub struct RealtimeDatabase {
    base_url: String,
    auth: Option<String>,
}

impl RealtimeDatabase {
    pub fn new(base_url: impl Into<String>, auth: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
        }
    }

    /// REST endpoint of a collection, e.g. `<base>/events.json`.
    pub fn collection_url(&self, path: &str) -> String {
        format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }
}

impl EventStore for RealtimeDatabase {
    async fn fetch_events(&self) -> Result<Option<RawCollection>, StoreError> {
        let url = self.collection_url(EVENTS_PATH);

        let mut request = Request::get(&url);
        if let Some(token) = &self.auth {
            request = request.query([("auth", token.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !response.ok() {
            return Err(StoreError::Status {
                status: response.status(),
                status_text: response.status_text(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        parse_collection(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url() {
        let db = RealtimeDatabase::new("https://events-demo.firebaseio.com/", None);
        assert_eq!(
            db.collection_url(EVENTS_PATH),
            "https://events-demo.firebaseio.com/events.json"
        );
        assert_eq!(
            db.collection_url("/events/"),
            "https://events-demo.firebaseio.com/events.json"
        );
    }
}
