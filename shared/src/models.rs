use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Weekday};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::expansion::DATE_FORMAT;

/// Kind of event shown on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Regular,
    #[default]
    Special,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Special => "special",
        }
    }
}

/// How often a template repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    #[default]
    #[serde(other)]
    Unsupported,
}

/// Weekday stored by its full English name ("Monday")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfWeek(pub Weekday);

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek(Weekday::Mon),
        DayOfWeek(Weekday::Tue),
        DayOfWeek(Weekday::Wed),
        DayOfWeek(Weekday::Thu),
        DayOfWeek(Weekday::Fri),
        DayOfWeek(Weekday::Sat),
        DayOfWeek(Weekday::Sun),
    ];

    pub fn weekday(self) -> Weekday {
        self.0
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    /// Accepts full or abbreviated names in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Weekday>()
            .map(DayOfWeek)
            .map_err(|_| format!("unknown day of week: {:?}", s))
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Recurrence descriptor attached to a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
}

impl Recurrence {
    pub fn weekly(day: DayOfWeek) -> Self {
        Self {
            frequency: Frequency::Weekly,
            day_of_week: Some(day),
        }
    }

    /// The day a weekly template lands on. `None` for anything that
    /// should not be materialized as a weekly series.
    pub fn weekly_day(&self) -> Option<DayOfWeek> {
        match self.frequency {
            Frequency::Weekly => self.day_of_week,
            Frequency::Unsupported => None,
        }
    }
}

/// A concrete, dated event instance as rendered by the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Event {
    /// Calendar date of this instance, when it has one that parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_event_date)
    }

    /// Key of the stored template this instance came from.
    ///
    /// Weekly instances carry an `-<index>` suffix that is stripped here;
    /// single events use their id as is.
    pub fn template_key(&self) -> &str {
        if self.recurrence.as_ref().and_then(Recurrence::weekly_day).is_none() {
            return &self.id;
        }
        match self.id.rsplit_once('-') {
            Some((key, index)) if !key.is_empty() && index.parse::<usize>().is_ok() => key,
            _ => &self.id,
        }
    }

    /// Image URL, ignoring blank strings.
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Stored template record, keyed by its collection key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_type: Option<EventType>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// Decode an optional field, treating values of the wrong shape as unset.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Form payload produced by the create/edit modal
#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct EventDraft {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 50))]
    pub time: String,

    #[validate(custom = "validate_event_date")]
    pub date: Option<String>,

    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(url)]
    pub image_url: Option<String>,

    pub event_type: EventType,

    pub weekly_day: Option<DayOfWeek>,
}

impl EventDraft {
    /// Prefill a draft from an instance being edited.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            time: event.time.clone(),
            date: event.date.clone(),
            description: event.description.clone(),
            image_url: event.image_url.clone(),
            event_type: event.event_type,
            weekly_day: event.recurrence.as_ref().and_then(Recurrence::weekly_day),
        }
    }

    /// Template record for this draft. Weekly drafts drop their one-off date.
    pub fn into_record(self) -> EventRecord {
        let (date, event_type, recurrence) = match self.weekly_day {
            Some(day) => (None, EventType::Regular, Some(Recurrence::weekly(day))),
            None => (self.date, self.event_type, None),
        };

        EventRecord {
            title: self.title.trim().to_string(),
            time: self.time.trim().to_string(),
            date,
            description: self.description,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            event_type: Some(event_type),
            recurrence,
        }
    }
}

/// Date-only layouts accepted besides [`DATE_FORMAT`].
const EXTRA_DATE_FORMATS: [&str; 4] = ["%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Local timestamps without an offset.
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse a stored date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, timestamps without an offset
/// and a few written-out forms such as `12/31/2026` or `December 31, 2026`.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    std::iter::once(DATE_FORMAT)
        .chain(EXTRA_DATE_FORMATS)
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
}

fn validate_event_date(date: &str) -> Result<(), ValidationError> {
    if parse_event_date(date).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_date"))
    }
}
