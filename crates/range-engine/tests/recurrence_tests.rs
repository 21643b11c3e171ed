//! Tests for fixed-interval recurrence generation.

use range_engine::config::EngineOptions;
use range_engine::recurrence::generate_with_options;
use range_engine::{generate, resolve_instant, Instant, RangeError, Unit};

fn at(s: &str) -> Instant {
    resolve_instant(&s.into(), None).unwrap()
}

// ---------------------------------------------------------------------------
// Inclusive endpoints
// ---------------------------------------------------------------------------

#[test]
fn every_two_days_includes_both_endpoints() {
    let result = generate("2025-06-10", "2025-06-20", Unit::Day, 2, None)
        .expect("should generate successfully");

    let expected: Vec<Instant> = ["10", "12", "14", "16", "18", "20"]
        .iter()
        .map(|d| at(&format!("2025-06-{}", d)))
        .collect();
    assert_eq!(result, expected, "6 occurrences, inclusive of both endpoints");
}

#[test]
fn end_not_on_step_is_not_emitted() {
    let result = generate("2025-06-10", "2025-06-19", Unit::Day, 2, None).unwrap();
    assert_eq!(result.len(), 5);
    assert_eq!(*result.last().unwrap(), at("2025-06-18"));
}

#[test]
fn start_equal_to_end_yields_single_occurrence() {
    let result = generate("2025-06-10T09:00:00Z", "2025-06-10T09:00:00Z", Unit::Hour, 1, None)
        .unwrap();
    assert_eq!(result, vec![at("2025-06-10T09:00:00Z")]);
}

#[test]
fn hourly_steps() {
    let result = generate("2025-06-10T09:00:00Z", "2025-06-10T12:30:00Z", Unit::Hour, 1, None)
        .unwrap();
    let hours: Vec<String> = result.iter().map(|i| i.format("%H:%M").unwrap()).collect();
    assert_eq!(hours, vec!["09:00", "10:00", "11:00", "12:00"]);
}

// ---------------------------------------------------------------------------
// Valid but empty vs malformed
// ---------------------------------------------------------------------------

#[test]
fn start_after_end_is_empty_not_error() {
    let result = generate("2025-06-20", "2025-06-10", Unit::Day, 1, None).unwrap();
    assert!(result.is_empty());
}

#[test]
fn zero_interval_is_rejected() {
    let err = generate("2025-06-10", "2025-06-20", Unit::Day, 0, None).unwrap_err();
    assert_eq!(err, RangeError::NonPositiveStep("interval"));
}

#[test]
fn unknown_timezone_is_rejected() {
    let err = generate("2025-06-10", "2025-06-20", Unit::Day, 1, Some("Not/A_Zone")).unwrap_err();
    assert!(matches!(err, RangeError::InvalidTimezone(_)));
}

#[test]
fn unparseable_endpoint_is_rejected() {
    let err = generate("June tenth", "2025-06-20", Unit::Day, 1, None).unwrap_err();
    assert!(matches!(err, RangeError::InvalidDatetime(_)));
}

// ---------------------------------------------------------------------------
// Non-uniform calendar units
// ---------------------------------------------------------------------------

#[test]
fn monthly_from_month_end_does_not_drift() {
    let result = generate("2025-01-31", "2025-05-31", Unit::Month, 1, None).unwrap();
    let days: Vec<String> = result
        .iter()
        .map(|i| i.date_key().to_string())
        .collect();
    assert_eq!(
        days,
        vec!["2025-01-31", "2025-02-28", "2025-03-31", "2025-04-30", "2025-05-31"]
    );
}

#[test]
fn yearly_from_leap_day() {
    let result = generate("2024-02-29", "2028-03-01", Unit::Year, 2, None).unwrap();
    let days: Vec<String> = result
        .iter()
        .map(|i| i.date_key().to_string())
        .collect();
    assert_eq!(days, vec!["2024-02-29", "2026-02-28", "2028-02-29"]);
}

#[test]
fn weekly_steps() {
    let result = generate("2025-06-02", "2025-06-30", Unit::Week, 1, None).unwrap();
    assert_eq!(result.len(), 5);
    assert!(result.iter().all(|i| i.weekday() == 1), "all Mondays");
}

// ---------------------------------------------------------------------------
// Timezones and DST
// ---------------------------------------------------------------------------

#[test]
fn daily_series_keeps_local_time_across_spring_forward() {
    // New York springs forward on 2025-03-09.
    let result = generate(
        "2025-03-07T09:00:00",
        "2025-03-11T09:00:00",
        Unit::Day,
        1,
        Some("America/New_York"),
    )
    .unwrap();

    assert_eq!(result.len(), 5);
    for occurrence in &result {
        assert_eq!(occurrence.format("%H:%M").unwrap(), "09:00");
    }
    // 09:00 EST = 14:00 UTC, 09:00 EDT = 13:00 UTC
    assert_eq!(result[0].utc().format("%H").to_string(), "14");
    assert_eq!(result[4].utc().format("%H").to_string(), "13");
}

#[test]
fn absolute_endpoints_are_normalized_into_zone() {
    let result = generate(
        "2025-06-10T04:00:00Z",
        "2025-06-12T04:00:00Z",
        Unit::Day,
        1,
        Some("America/New_York"),
    )
    .unwrap();
    assert_eq!(result.len(), 3);
    assert_eq!(result[0].to_rfc3339(), "2025-06-10T00:00:00-04:00");
}

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

#[test]
fn max_items_caps_output() {
    let options = EngineOptions {
        max_items: 3,
        ..EngineOptions::default()
    };
    let err = generate_with_options("2025-06-10", "2025-06-20", Unit::Day, 2, None, &options)
        .unwrap_err();
    assert_eq!(err, RangeError::LimitExceeded { limit: 3 });
}

#[test]
fn output_exactly_at_limit_is_allowed() {
    let options = EngineOptions {
        max_items: 6,
        ..EngineOptions::default()
    };
    let result =
        generate_with_options("2025-06-10", "2025-06-20", Unit::Day, 2, None, &options).unwrap();
    assert_eq!(result.len(), 6);
}
