//! Event record access over loosely-typed JSON objects.
//!
//! Calendar rows arrive as JSON objects with a small fixed temporal core
//! (`id`, `start`, `end`, `recurrence`) surrounded by arbitrary caller
//! fields — titles, colors, goal links, whatever the planner attaches next.
//! Everything here treats the record as an open field set: the temporal core
//! is parsed, the rest is echoed untouched on every emitted instance.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};

/// A calendar event record: a JSON object with an open field set.
pub type EventRecord = Map<String, Value>;

/// Timestamp shapes accepted from callers: `T` or space separator, seconds
/// optional, fractional seconds optional.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a naive local ISO-8601 timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    Err(EngineError::InvalidTimestamp(s.to_string()))
}

/// Format a timestamp back to the wire shape.
///
/// Seconds are always present; the fraction appears only when non-zero.
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Parse a JSON array of event records — the shape the planner's API layer
/// exchanges. Rejects anything that is not an array of objects.
pub fn parse_events(json: &str) -> Result<Vec<EventRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(EngineError::NotAnArray);
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(EngineError::NotAnArray),
        })
        .collect()
}

/// Read a field as a timestamp; `None` when absent, non-string or unparsable.
pub(crate) fn field_timestamp(event: &EventRecord, key: &str) -> Option<NaiveDateTime> {
    event
        .get(key)?
        .as_str()
        .and_then(|s| parse_timestamp(s).ok())
}

/// Materialize one occurrence of a template.
///
/// The copy keeps every caller field; `start`/`end` are overwritten with the
/// occurrence's own timestamps. Generated occurrences — anything other than
/// the template's own start — are tagged with `recurringEventId`,
/// `isRecurringInstance` and the template's original timestamps, so the
/// caller can tell a stored row from a materialized repeat.
pub(crate) fn make_instance(
    template: &EventRecord,
    start: NaiveDateTime,
    end: NaiveDateTime,
    generated: bool,
) -> EventRecord {
    let mut instance = template.clone();
    instance.insert("start".into(), Value::String(format_timestamp(start)));
    instance.insert("end".into(), Value::String(format_timestamp(end)));
    if generated {
        if let Some(id) = template.get("id") {
            instance.insert("recurringEventId".into(), id.clone());
        }
        instance.insert("isRecurringInstance".into(), Value::Bool(true));
        if let Some(original) = template.get("start") {
            instance.insert("originalStart".into(), original.clone());
        }
        if let Some(original) = template.get("end") {
            instance.insert("originalEnd".into(), original.clone());
        }
    }
    instance
}
