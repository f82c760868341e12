//! Materializes stored templates into dated event instances.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::warn;

use crate::models::{Event, EventRecord, EventType, Recurrence};
use crate::occurrence::next_occurrences;
use crate::store::{ordered_entries, RawCollection};

/// Instances generated for each weekly template.
pub const WEEKLY_INSTANCE_COUNT: usize = 4;

/// Format of materialized instance dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Expand one template into its instances.
///
/// Weekly templates yield [`WEEKLY_INSTANCE_COUNT`] regular instances with
/// ids `<key>-<index>`. Everything else yields a single instance that keeps
/// the template's key, date and type (`special` when unset).
pub fn expand_record(key: &str, record: &EventRecord, today: NaiveDate) -> Vec<Event> {
    if let Some(day) = record.recurrence.as_ref().and_then(Recurrence::weekly_day) {
        return next_occurrences(day.weekday(), WEEKLY_INSTANCE_COUNT, today)
            .into_iter()
            .enumerate()
            .map(|(index, date)| Event {
                id: format!("{}-{}", key, index),
                title: record.title.clone(),
                time: record.time.clone(),
                date: Some(date.format(DATE_FORMAT).to_string()),
                description: record.description.clone(),
                image_url: record.image_url.clone(),
                event_type: EventType::Regular,
                recurrence: record.recurrence.clone(),
            })
            .collect();
    }

    if record.recurrence.is_some() {
        warn!(key, "recurrence is not weekly or has no day, showing as a single event");
    }

    vec![Event {
        id: key.to_string(),
        title: record.title.clone(),
        time: record.time.clone(),
        date: record.date.clone(),
        description: record.description.clone(),
        image_url: record.image_url.clone(),
        event_type: record.event_type.unwrap_or_default(),
        recurrence: None,
    }]
}

/// Expand every record of a raw collection, in database key order.
///
/// Null entries are skipped silently; entries that do not decode as a
/// record are skipped with a warning so one bad row cannot hide the rest.
pub fn expand_collection(raw: &RawCollection, today: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();

    for (key, value) in ordered_entries(raw) {
        if value.is_null() {
            continue;
        }

        match serde_json::from_value::<EventRecord>(value.clone()) {
            Ok(record) => events.extend(expand_record(key, &record, today)),
            Err(e) => warn!(key = %key, error = %e, "skipping malformed event record"),
        }
    }

    events
}

/// Sort instances ascending by date.
///
/// An instance without a usable date compares equal to everything, so it
/// keeps its slot while the dated instances are stably sorted around it.
pub fn sort_by_date(events: &mut [Event]) {
    let dated: Vec<(usize, NaiveDate)> = events
        .iter()
        .enumerate()
        .filter_map(|(slot, event)| event.parsed_date().map(|date| (slot, date)))
        .collect();

    let mut order = dated.clone();
    order.sort_by_key(|(_, date)| *date);

    let sorted: Vec<Event> = order.iter().map(|(slot, _)| events[*slot].clone()).collect();
    for ((slot, _), event) in dated.iter().zip(sorted) {
        events[*slot] = event;
    }
}

/// Non-blank image URLs, deduplicated in first-seen order.
pub fn image_urls(events: &[Event]) -> Vec<String> {
    let mut seen = HashSet::new();
    events
        .iter()
        .filter_map(Event::image)
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}
