//! Recurrence expansion — turns recurring event templates into the concrete
//! occurrences that fall inside a query window.
//!
//! Expansion is pure and stateless: it reads templates, never mutates them,
//! and emits shallow copies with occurrence timestamps filled in. All
//! arithmetic is naive local time; the planner stores wall-clock instants
//! and recurrence is defined on the calendar, not on an offset timeline.
//!
//! Enumeration is always bounded by the *effective end* — the earlier of the
//! query window's end and the rule's own end date at 23:59:59 — so a rule
//! that has run for years expands in time proportional to the window, not to
//! the rule's age. Weekly rules additionally jump straight to the
//! neighborhood of the window start instead of walking week-by-week from the
//! anchor (see [`weekly_occurrences`]).

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::event::{field_timestamp, make_instance, EventRecord};
use crate::rule::RecurrenceRule;

/// Expand every recurring event in `events` into the concrete occurrences
/// overlapping `[range_start, range_end]`.
///
/// Non-recurring events — no rule, `"type": "none"`, unknown types,
/// malformed payloads — pass through unchanged. When either window bound is
/// missing the recurring events cannot be safely bounded, so they also pass
/// through unchanged rather than expanding without limit.
///
/// Output order is unspecified; callers sort (see [`crate::schedule`]).
pub fn expand_events(
    events: &[EventRecord],
    range_start: Option<NaiveDateTime>,
    range_end: Option<NaiveDateTime>,
) -> Vec<EventRecord> {
    let (Some(range_start), Some(range_end)) = (range_start, range_end) else {
        return events.to_vec();
    };

    let mut result = Vec::new();
    for event in events {
        match RecurrenceRule::from_field(event.get("recurrence")) {
            Some(rule) => result.extend(expand_single(event, &rule, range_start, range_end)),
            None => result.push(event.clone()),
        }
    }
    result
}

/// Expand one template against the window.
fn expand_single(
    event: &EventRecord,
    rule: &RecurrenceRule,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> Vec<EventRecord> {
    let (Some(start), Some(end)) = (
        field_timestamp(event, "start"),
        field_timestamp(event, "end"),
    ) else {
        // Rows with unreadable timestamps are the caller's problem to fix,
        // but they must still show up in the calendar.
        return vec![event.clone()];
    };
    let duration = end - start;

    let effective_end = match rule.until_bound() {
        Some(until) => range_end.min(until),
        None => range_end,
    };
    // Covers both "hasn't begun inside the visible window" and an end date
    // that predates the template entirely.
    if start > effective_end {
        return Vec::new();
    }

    let occurrences = match rule {
        RecurrenceRule::Daily { .. } => daily_occurrences(start, effective_end),
        RecurrenceRule::Weekly { days, .. } => {
            weekly_occurrences(start, range_start, effective_end, days.as_deref(), 1)
        }
        RecurrenceRule::Biweekly { days, .. } => {
            weekly_occurrences(start, range_start, effective_end, days.as_deref(), 2)
        }
        RecurrenceRule::Monthly { .. } => monthly_occurrences(start, effective_end),
        RecurrenceRule::Yearly { .. } => yearly_occurrences(start, effective_end),
    };

    occurrences
        .into_iter()
        .filter(|occurrence| *occurrence + duration >= range_start)
        .map(|occurrence| {
            make_instance(
                event,
                occurrence,
                occurrence + duration,
                occurrence != start,
            )
        })
        .collect()
}

/// One occurrence per day from the template start.
fn daily_occurrences(start: NaiveDateTime, effective_end: NaiveDateTime) -> Vec<NaiveDateTime> {
    let mut occurrences = Vec::new();
    let mut current = start;
    while current <= effective_end {
        occurrences.push(current);
        current += Duration::days(1);
    }
    occurrences
}

/// Weekly and biweekly stepping.
///
/// Anchors on the Monday of the template's start week, steps the anchor by
/// `interval_weeks` at a time, and within each anchored week emits one
/// occurrence per selected weekday at the template's time-of-day.
/// Occurrences before the template's own start are discarded; the walk stops
/// once the anchor passes `effective_end + 6 days`, which still catches a
/// late weekday in the final partial week.
///
/// When the window starts long after the template, the anchor jumps forward
/// by whole interval multiples to just before the window instead of walking
/// every intermediate week. Resuming one interval early keeps a boundary
/// occurrence from being skipped when the alignment rounds down.
fn weekly_occurrences(
    start: NaiveDateTime,
    range_start: NaiveDateTime,
    effective_end: NaiveDateTime,
    days: Option<&[Weekday]>,
    interval_weeks: i64,
) -> Vec<NaiveDateTime> {
    let time = start.time();
    let mut day_offsets: Vec<i64> = match days {
        Some(days) => days
            .iter()
            .map(|day| i64::from(day.num_days_from_monday()))
            .collect(),
        None => vec![i64::from(start.weekday().num_days_from_monday())],
    };
    day_offsets.sort_unstable();
    day_offsets.dedup();

    let anchor_monday = monday_of(start.date());
    let mut current_monday = anchor_monday;
    if range_start > start {
        let weeks_diff = (monday_of(range_start.date()) - anchor_monday).num_days() / 7;
        let aligned = (weeks_diff / interval_weeks) * interval_weeks;
        current_monday += Duration::weeks((aligned - interval_weeks).max(0));
    }

    let horizon = effective_end + Duration::days(6);
    let mut occurrences = Vec::new();
    while current_monday.and_time(time) <= horizon {
        for offset in &day_offsets {
            let current = (current_monday + Duration::days(*offset)).and_time(time);
            if current < start || current > effective_end {
                continue;
            }
            occurrences.push(current);
        }
        current_monday += Duration::weeks(interval_weeks);
    }
    occurrences
}

/// Monthly stepping with day-of-month clamping.
///
/// The anchor day is the template's own start day and never shifts: a rule
/// anchored on the 31st lands on Apr 30 and returns to May 31.
fn monthly_occurrences(start: NaiveDateTime, effective_end: NaiveDateTime) -> Vec<NaiveDateTime> {
    let anchor_day = start.day();
    let time = start.time();
    let (mut year, mut month) = (start.year(), start.month());

    let mut occurrences = Vec::new();
    loop {
        let day = anchor_day.min(days_in_month(year, month));
        let Some(current) = NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(time))
        else {
            break;
        };
        if current > effective_end {
            break;
        }
        occurrences.push(current);
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    occurrences
}

/// Yearly stepping on a fixed anchor month and day.
///
/// A Feb 29 anchor falls back to Feb 28 in non-leap years and returns to
/// Feb 29 in the next leap year; the anchor itself never shifts.
fn yearly_occurrences(start: NaiveDateTime, effective_end: NaiveDateTime) -> Vec<NaiveDateTime> {
    let (anchor_month, anchor_day) = (start.month(), start.day());
    let time = start.time();
    let mut year = start.year();

    let mut occurrences = Vec::new();
    loop {
        // from_ymd_opt only fails here for Feb 29 in a non-leap year; the
        // anchor is valid in its own year.
        let date = NaiveDate::from_ymd_opt(year, anchor_month, anchor_day)
            .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28));
        let Some(current) = date.map(|d| d.and_time(time)) else {
            break;
        };
        if current > effective_end {
            break;
        }
        occurrences.push(current);
        year += 1;
    }
    occurrences
}

/// The Monday on or before the given date.
fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Number of days in the given month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
