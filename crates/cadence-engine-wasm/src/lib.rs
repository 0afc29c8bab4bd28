//! WASM bindings for cadence-engine.
//!
//! Exposes recurrence expansion and calendar view assembly to JavaScript via
//! `wasm-bindgen`. Events cross the boundary as JSON strings — the same
//! array-of-objects shape the planner's API layer exchanges — so the web
//! client can expand locally without a round trip.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p cadence-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/cadence-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/cadence_engine_wasm.wasm
//! ```

use cadence_engine::{event, expander, schedule};
use chrono::NaiveDateTime;
use wasm_bindgen::prelude::*;

/// Parse an optional window bound, mapping failures to a JS error.
fn parse_bound(flag: &str, value: Option<String>) -> Result<Option<NaiveDateTime>, JsValue> {
    match value {
        None => Ok(None),
        Some(s) => event::parse_timestamp(&s)
            .map(Some)
            .map_err(|e| JsValue::from_str(&format!("invalid {}: {}", flag, e))),
    }
}

/// Parse the JSON event array, mapping failures to a JS error.
fn parse_records(events_json: &str) -> Result<Vec<event::EventRecord>, JsValue> {
    event::parse_events(events_json)
        .map_err(|e| JsValue::from_str(&format!("invalid events: {}", e)))
}

/// Expand recurring events into concrete occurrences within a window.
///
/// `events_json` is a JSON array of event objects. `range_start` and
/// `range_end` are naive local ISO-8601 timestamps, both optional — when
/// either is missing, recurring events pass through unexpanded. Returns the
/// instances as a JSON array string.
#[wasm_bindgen(js_name = "expandEvents")]
pub fn expand_events(
    events_json: &str,
    range_start: Option<String>,
    range_end: Option<String>,
) -> Result<String, JsValue> {
    let events = parse_records(events_json)?;
    let from = parse_bound("range_start", range_start)?;
    let to = parse_bound("range_end", range_end)?;

    let instances = expander::expand_events(&events, from, to);

    serde_json::to_string(&instances)
        .map_err(|e| JsValue::from_str(&format!("serialization error: {}", e)))
}

/// Assemble a sorted calendar view from a mixed event list.
///
/// Splits the input by the presence of a usable recurrence rule,
/// window-filters the plain rows, expands the recurring templates, and
/// returns the merged list sorted by start as a JSON array string.
#[wasm_bindgen(js_name = "assembleView")]
pub fn assemble_view(
    events_json: &str,
    range_start: Option<String>,
    range_end: Option<String>,
) -> Result<String, JsValue> {
    let events = parse_records(events_json)?;
    let from = parse_bound("range_start", range_start)?;
    let to = parse_bound("range_end", range_end)?;

    let (recurring, non_recurring) = schedule::split_recurring(events);
    let view = schedule::assemble_view(&non_recurring, &recurring, from, to);

    serde_json::to_string(&view)
        .map_err(|e| JsValue::from_str(&format!("serialization error: {}", e)))
}
