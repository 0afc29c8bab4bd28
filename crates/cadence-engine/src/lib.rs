//! # cadence-engine
//!
//! Deterministic calendar recurrence expansion for the cadence planner.
//!
//! Stored calendar rows carry an optional recurrence payload (daily, weekly,
//! biweekly, monthly or yearly; optionally bounded by an end date; weekly
//! rules may pick a set of weekdays). Given those rows and a query window,
//! this crate enumerates every concrete occurrence overlapping the window
//! while preserving each row's duration and caller-defined fields. It is
//! pure and stateless: no storage, no users, no HTTP — just calendar
//! arithmetic.
//!
//! ## Quick start
//!
//! ```rust
//! use cadence_engine::{expand_events, parse_events, parse_timestamp};
//!
//! let events = parse_events(
//!     r#"[{"id": 1, "title": "Standup",
//!          "start": "2024-01-01T09:00:00", "end": "2024-01-01T09:15:00",
//!          "recurrence": "{\"type\": \"daily\"}"}]"#,
//! )
//! .unwrap();
//!
//! let from = parse_timestamp("2024-01-08T00:00:00").ok();
//! let to = parse_timestamp("2024-01-10T23:59:59").ok();
//! let instances = expand_events(&events, from, to);
//! assert_eq!(instances.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`expander`] — recurring templates → concrete occurrences in a window
//! - [`rule`] — the recurrence rule sum type and its lenient decoding
//! - [`schedule`] — window filtering, merge with non-recurring rows, sorting
//! - [`event`] — record access and timestamp parsing/formatting
//! - [`error`] — error types for the parsing surface

pub mod error;
pub mod event;
pub mod expander;
pub mod rule;
pub mod schedule;

pub use error::EngineError;
pub use event::{format_timestamp, parse_events, parse_timestamp, EventRecord};
pub use expander::expand_events;
pub use rule::RecurrenceRule;
pub use schedule::{assemble_view, filter_to_window, sort_by_start, split_recurring};
