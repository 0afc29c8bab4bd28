//! Recurrence rule decoding.
//!
//! The planner stores a rule as a JSON payload on the event row, either
//! inline or as a JSON-encoded string:
//!
//! ```json
//! { "type": "weekly", "endDate": "2025-06-30", "days": [1, 3, 5] }
//! ```
//!
//! Decoding is deliberately lenient. A missing payload, the explicit
//! `"none"` type, an unknown type tag, and any malformed shape all decode to
//! "no rule", and the owning event is passed through unexpanded. A corrupt
//! rule must never make an event disappear from the calendar.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::Deserialize;
use serde_json::Value;

use crate::event::parse_timestamp;

/// A decoded recurrence rule, one variant per supported cadence.
///
/// `until` is the rule's own inclusive end date; occurrences stop at
/// 23:59:59 local time on that date. `days` is the weekly weekday selection;
/// absent means "the template's own start weekday".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    Daily {
        until: Option<NaiveDate>,
    },
    Weekly {
        until: Option<NaiveDate>,
        days: Option<Vec<Weekday>>,
    },
    Biweekly {
        until: Option<NaiveDate>,
        days: Option<Vec<Weekday>>,
    },
    Monthly {
        until: Option<NaiveDate>,
    },
    Yearly {
        until: Option<NaiveDate>,
    },
}

/// Wire shape of the stored payload. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RuleWire {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
    days: Option<Vec<i64>>,
}

impl RecurrenceRule {
    /// Decode the raw `recurrence` field of an event record.
    ///
    /// Accepts an inline object or a JSON-encoded string. Returns `None` for
    /// every shape that does not decode to a known rule: absent, null, empty
    /// string, `"type": "none"`, unknown type tags, unparsable JSON, or an
    /// `endDate` that is not a calendar date.
    pub fn from_field(field: Option<&Value>) -> Option<Self> {
        let value = match field? {
            Value::Null => return None,
            Value::String(s) if s.is_empty() => return None,
            Value::String(s) => serde_json::from_str(s).ok()?,
            object @ Value::Object(_) => object.clone(),
            _ => return None,
        };
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Option<Self> {
        let wire: RuleWire = serde_json::from_value(value).ok()?;
        let until = match wire.end_date.as_deref() {
            None | Some("") => None,
            Some(s) => Some(parse_end_date(s)?),
        };
        let days = wire
            .days
            .map(|indices| indices.into_iter().map(weekday_from_js).collect());

        match wire.kind.as_str() {
            "daily" => Some(Self::Daily { until }),
            "weekly" => Some(Self::Weekly { until, days }),
            "biweekly" => Some(Self::Biweekly { until, days }),
            "monthly" => Some(Self::Monthly { until }),
            "yearly" => Some(Self::Yearly { until }),
            _ => None,
        }
    }

    /// Inclusive end-of-day bound derived from the rule's end date, if any.
    pub fn until_bound(&self) -> Option<NaiveDateTime> {
        let until = match self {
            Self::Daily { until }
            | Self::Weekly { until, .. }
            | Self::Biweekly { until, .. }
            | Self::Monthly { until }
            | Self::Yearly { until } => *until,
        };
        until.and_then(|date| date.and_hms_opt(23, 59, 59))
    }
}

/// Parse a rule end date: a plain `YYYY-MM-DD`, or a full timestamp whose
/// date part is taken.
fn parse_end_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).ok().map(|dt| dt.date()))
}

/// Convert a JS weekday index (Sunday=0 … Saturday=6) to a weekday.
///
/// Out-of-range indices fold with Euclidean mod, mirroring the modular
/// arithmetic the API layer has always applied.
pub fn weekday_from_js(index: i64) -> Weekday {
    match index.rem_euclid(7) {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// Convert a weekday back to its JS index (Sunday=0 … Saturday=6).
pub fn weekday_to_js(day: Weekday) -> i64 {
    (day.num_days_from_monday() as i64 + 1) % 7
}
