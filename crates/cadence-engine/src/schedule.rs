//! Calendar view assembly — the merge step between stored rows and the
//! expanded occurrence stream.
//!
//! The planner's API layer splits stored events into non-recurring rows
//! (window-filtered) and recurring templates (expanded), then serves the
//! concatenation sorted by start. Keeping that merge here means every
//! consumer — HTTP, CLI, WASM — assembles views identically.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::event::{field_timestamp, EventRecord};
use crate::expander::expand_events;
use crate::rule::RecurrenceRule;

/// Retain the events overlapping `[range_start, range_end]`.
///
/// An absent bound leaves that side of the window open. Events with
/// unreadable timestamps are retained — filtering is a convenience, not a
/// validator.
pub fn filter_to_window(
    events: &[EventRecord],
    range_start: Option<NaiveDateTime>,
    range_end: Option<NaiveDateTime>,
) -> Vec<EventRecord> {
    events
        .iter()
        .filter(|event| {
            let end_ok = match (range_start, field_timestamp(event, "end")) {
                (Some(range_start), Some(end)) => end >= range_start,
                _ => true,
            };
            let start_ok = match (range_end, field_timestamp(event, "start")) {
                (Some(range_end), Some(start)) => start <= range_end,
                _ => true,
            };
            end_ok && start_ok
        })
        .cloned()
        .collect()
}

/// Split a mixed event list by whether a usable recurrence rule is present.
///
/// Returns `(recurring, non_recurring)`. Events whose payload is malformed
/// land on the non-recurring side, matching the expansion leniency policy.
pub fn split_recurring(events: Vec<EventRecord>) -> (Vec<EventRecord>, Vec<EventRecord>) {
    events
        .into_iter()
        .partition(|event| RecurrenceRule::from_field(event.get("recurrence")).is_some())
}

/// Assemble the calendar view for a window: window-filter the non-recurring
/// rows, expand the recurring templates, concatenate, and sort by start.
pub fn assemble_view(
    non_recurring: &[EventRecord],
    recurring: &[EventRecord],
    range_start: Option<NaiveDateTime>,
    range_end: Option<NaiveDateTime>,
) -> Vec<EventRecord> {
    let mut view = filter_to_window(non_recurring, range_start, range_end);
    view.extend(expand_events(recurring, range_start, range_end));
    sort_by_start(&mut view);
    view
}

/// Sort events by their `start` field.
///
/// Compares the serialized strings — naive ISO-8601 timestamps order
/// lexicographically. Events without a readable `start` sort first.
pub fn sort_by_start(events: &mut [EventRecord]) {
    events.sort_by(|a, b| start_key(a).cmp(&start_key(b)));
}

fn start_key(event: &EventRecord) -> Option<&str> {
    event.get("start").and_then(Value::as_str)
}
