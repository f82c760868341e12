//! Remote source of truth for event templates.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::StoreError;

/// Path of the events collection in the realtime database.
pub const EVENTS_PATH: &str = "events";

/// Raw collection as returned by the database: key to record JSON.
pub type RawCollection = BTreeMap<String, Value>;

/// Read access to the events collection.
#[allow(async_fn_in_trait)]
pub trait EventStore {
    /// Fetch the whole collection. `Ok(None)` means it does not exist.
    async fn fetch_events(&self) -> Result<Option<RawCollection>, StoreError>;
}

/// Interpret a collection body.
///
/// `null` is an absent collection. Objects map keys to records. Arrays show
/// up when every key is a small integer; their indices become the keys and
/// holes are dropped.
pub fn parse_collection(body: Value) -> Result<Option<RawCollection>, StoreError> {
    match body {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map.into_iter().collect())),
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .enumerate()
                .filter(|(_, value)| !value.is_null())
                .map(|(index, value)| (index.to_string(), value))
                .collect(),
        )),
        other => Err(StoreError::Malformed(format!(
            "expected an object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Entries in the order the database lists them: integer keys first in
/// numeric order, then every other key in string order.
pub fn ordered_entries(raw: &RawCollection) -> Vec<(&str, &Value)> {
    let mut entries: Vec<(&str, &Value)> = raw
        .iter()
        .map(|(key, value)| (key.as_str(), value))
        .collect();
    entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    entries
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (integer_key(a), integer_key(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Keys that read as a canonical 32-bit integer ("7", "-3", not "07").
fn integer_key(key: &str) -> Option<i32> {
    key.parse::<i32>()
        .ok()
        .filter(|n| n.to_string() == key)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_body_is_absent() {
        assert_eq!(parse_collection(Value::Null), Ok(None));
    }

    #[test]
    fn test_object_body_keeps_keys() {
        let raw = parse_collection(json!({"b": {"title": "B"}, "a": {"title": "A"}}))
            .unwrap()
            .unwrap();
        assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_array_body_uses_indices() {
        let raw = parse_collection(json!([null, {"title": "One"}, {"title": "Two"}]))
            .unwrap()
            .unwrap();
        assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_integer_keys_are_ordered_numerically() {
        let items: Vec<Value> = (0..12).map(|i| json!({"title": i})).collect();
        let raw = parse_collection(Value::Array(items)).unwrap().unwrap();

        let keys: Vec<&str> = ordered_entries(&raw).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]
        );
    }

    #[test]
    fn test_integer_keys_come_before_other_keys() {
        let raw = parse_collection(json!({"b": 1, "10": 2, "a": 3, "2": 4, "07": 5}))
            .unwrap()
            .unwrap();

        let keys: Vec<&str> = ordered_entries(&raw).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["2", "10", "07", "a", "b"]);
    }

    #[test]
    fn test_scalar_body_is_malformed() {
        assert!(matches!(
            parse_collection(json!("oops")),
            Err(StoreError::Malformed(_))
        ));
    }
}
