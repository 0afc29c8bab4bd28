//! Property-based tests for recurrence expansion using proptest.
//!
//! These verify invariants that should hold for *any* rule and window, not
//! just the hand-picked examples in `expander_tests.rs` — including the
//! equivalence of the weekly jump-ahead with a naive week-by-week walk.

use cadence_engine::{expand_events, format_timestamp, parse_timestamp, EventRecord};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A naive datetime in the 2019-2026 range. Day is capped at 28 to avoid
/// invalid month/day combos.
fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (2019i32..=2026, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59).prop_map(|(y, m, d, h, min)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("strategy only produces valid dates")
    })
}

fn arb_duration_minutes() -> impl Strategy<Value = i64> {
    15i64..=480
}

fn arb_rule_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("daily"),
        Just("weekly"),
        Just("biweekly"),
        Just("monthly"),
        Just("yearly"),
    ]
}

/// An optional weekly day selection: up to four JS weekday indices.
fn arb_days() -> impl Strategy<Value = Option<Vec<i64>>> {
    proptest::option::of(proptest::collection::vec(0i64..=6, 1..4))
}

fn template(start: NaiveDateTime, minutes: i64, recurrence: Value) -> EventRecord {
    json!({
        "id": 99,
        "title": "prop",
        "start": format_timestamp(start),
        "end": format_timestamp(start + Duration::minutes(minutes)),
        "recurrence": recurrence,
    })
    .as_object()
    .expect("template fixture is an object")
    .clone()
}

fn rule_json(kind: &str, days: &Option<Vec<i64>>) -> Value {
    match days {
        Some(days) if kind == "weekly" || kind == "biweekly" => {
            json!({"type": kind, "days": days})
        }
        _ => json!({"type": kind}),
    }
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: expansion never panics, whatever the recurrence payload
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_never_panics_on_arbitrary_payloads(
        start in arb_datetime(),
        minutes in arb_duration_minutes(),
        payload in ".{0,60}",
        offset_days in -60i64..=400,
        window_days in 1i64..=60,
    ) {
        let event = template(start, minutes, Value::String(payload));
        let range_start = start + Duration::days(offset_days);
        let range_end = range_start + Duration::days(window_days);

        // Must not panic; pass-through or expansion are both acceptable.
        let _ = expand_events(&[event], Some(range_start), Some(range_end));
    }
}

// ---------------------------------------------------------------------------
// Property 2: duration is preserved on every emitted instance
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn duration_preserved(
        start in arb_datetime(),
        minutes in arb_duration_minutes(),
        kind in arb_rule_type(),
        days in arb_days(),
        offset_days in 0i64..=400,
        window_days in 1i64..=60,
    ) {
        let event = template(start, minutes, rule_json(kind, &days));
        let range_start = start + Duration::days(offset_days);
        let range_end = range_start + Duration::days(window_days);

        let instances = expand_events(&[event], Some(range_start), Some(range_end));
        for instance in &instances {
            let occ_start = parse_timestamp(instance["start"].as_str().unwrap()).unwrap();
            let occ_end = parse_timestamp(instance["end"].as_str().unwrap()).unwrap();
            prop_assert_eq!(
                occ_end - occ_start,
                Duration::minutes(minutes),
                "instance at {} does not keep the template duration",
                instance["start"].as_str().unwrap()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: every instance overlaps the query window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn instances_stay_within_window(
        start in arb_datetime(),
        minutes in arb_duration_minutes(),
        kind in arb_rule_type(),
        days in arb_days(),
        offset_days in 0i64..=400,
        window_days in 1i64..=60,
    ) {
        let event = template(start, minutes, rule_json(kind, &days));
        let range_start = start + Duration::days(offset_days);
        let range_end = range_start + Duration::days(window_days);

        let instances = expand_events(&[event], Some(range_start), Some(range_end));
        for instance in &instances {
            let occ_start = parse_timestamp(instance["start"].as_str().unwrap()).unwrap();
            let occ_end = parse_timestamp(instance["end"].as_str().unwrap()).unwrap();
            prop_assert!(occ_end >= range_start, "instance ends before the window");
            prop_assert!(occ_start <= range_end, "instance starts after the window");
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: exactly the non-seed instances carry generated markers
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn only_generated_instances_are_marked(
        start in arb_datetime(),
        minutes in arb_duration_minutes(),
        kind in arb_rule_type(),
        days in arb_days(),
        window_days in 1i64..=60,
    ) {
        let event = template(start, minutes, rule_json(kind, &days));
        let template_start = format_timestamp(start);
        // Window beginning at the template start, so the seed is eligible.
        let range_end = start + Duration::days(window_days);

        let instances = expand_events(&[event], Some(start), Some(range_end));
        for instance in &instances {
            let is_seed = instance["start"].as_str().unwrap() == template_start;
            let marked = instance.get("isRecurringInstance") == Some(&Value::Bool(true));
            prop_assert_eq!(marked, !is_seed);
            prop_assert_eq!(instance.get("recurringEventId").is_some(), !is_seed);
            prop_assert_eq!(instance.get("originalStart").is_some(), !is_seed);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: the weekly jump-ahead matches a naive week-by-week walk
// ---------------------------------------------------------------------------

/// Reference walk with no jumping: every interval week from the anchor.
fn brute_force_weekly(
    start: NaiveDateTime,
    duration: Duration,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    days: &Option<Vec<i64>>,
    interval_weeks: i64,
) -> Vec<String> {
    let time = start.time();
    let mut offsets: Vec<i64> = match days {
        Some(days) => days.iter().map(|js| (js - 1).rem_euclid(7)).collect(),
        None => vec![i64::from(start.weekday().num_days_from_monday())],
    };
    offsets.sort_unstable();
    offsets.dedup();

    let mut monday =
        start.date() - Duration::days(i64::from(start.weekday().num_days_from_monday()));
    let mut found = Vec::new();
    while monday.and_time(time) <= range_end + Duration::days(6) {
        for &offset in &offsets {
            let current = (monday + Duration::days(offset)).and_time(time);
            if current < start || current > range_end {
                continue;
            }
            if current + duration >= range_start {
                found.push(format_timestamp(current));
            }
        }
        monday += Duration::weeks(interval_weeks);
    }
    found.sort();
    found
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn weekly_jump_matches_brute_force(
        start in arb_datetime(),
        minutes in arb_duration_minutes(),
        biweekly in any::<bool>(),
        days in arb_days(),
        offset_weeks in 0i64..=350,
        window_days in 1i64..=21,
    ) {
        let kind = if biweekly { "biweekly" } else { "weekly" };
        let event = template(start, minutes, rule_json(kind, &days));
        let range_start = start + Duration::weeks(offset_weeks);
        let range_end = range_start + Duration::days(window_days);

        let instances = expand_events(&[event], Some(range_start), Some(range_end));
        let mut engine_starts: Vec<String> = instances
            .iter()
            .map(|i| i["start"].as_str().unwrap().to_string())
            .collect();
        engine_starts.sort();

        let expected = brute_force_weekly(
            start,
            Duration::minutes(minutes),
            range_start,
            range_end,
            &days,
            if biweekly { 2 } else { 1 },
        );
        prop_assert_eq!(engine_starts, expected);
    }
}
