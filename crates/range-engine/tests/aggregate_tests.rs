//! Tests for duration aggregation.

use range_engine::{aggregate, resolve_instant, split, Instant, Range, RangeError, Unit};

fn at(s: &str) -> Instant {
    resolve_instant(&s.into(), None).unwrap()
}

fn range(start: &str, end: &str) -> Range {
    Range::new(at(start), at(end)).unwrap()
}

#[test]
fn empty_collection_sums_to_zero() {
    assert_eq!(aggregate(&[], Unit::Day).unwrap(), 0.0);
}

#[test]
fn fractional_days_are_preserved() {
    let total = aggregate(&[range("2025-06-10", "2025-06-11T12:00:00Z")], Unit::Day).unwrap();
    assert_eq!(total, 1.5);
}

#[test]
fn sums_across_ranges() {
    let ranges = vec![
        range("2025-06-10T09:00:00Z", "2025-06-10T10:30:00Z"),
        range("2025-06-11T14:00:00Z", "2025-06-11T16:00:00Z"),
        range("2025-06-12T08:00:00Z", "2025-06-12T08:00:00Z"),
    ];
    assert_eq!(aggregate(&ranges, Unit::Hour).unwrap(), 3.5);
    assert_eq!(aggregate(&ranges, Unit::Minute).unwrap(), 210.0);
}

#[test]
fn calendar_months() {
    let ranges = vec![
        range("2025-01-15", "2025-03-15"),
        range("2025-04-01", "2025-04-16"),
    ];
    let total = aggregate(&ranges, Unit::Month).unwrap();
    // 2 whole months plus 15 of April's 30 days
    assert!((total - 2.5).abs() < 1e-12, "got {}", total);
}

#[test]
fn one_inverted_range_fails_the_whole_batch() {
    let ranges = vec![
        range("2025-06-10", "2025-06-11"),
        Range {
            start: at("2025-06-13"),
            end: at("2025-06-12"),
        },
        range("2025-06-14", "2025-06-15"),
    ];
    assert!(matches!(
        aggregate(&ranges, Unit::Day),
        Err(RangeError::InvertedRange { .. })
    ));
}

#[test]
fn split_then_aggregate_matches_whole_range() {
    let whole = range("2025-06-10T15:00:00Z", "2025-06-13T10:00:00Z");
    let chunks = split(&whole, Unit::Day, 1).unwrap();

    let whole_ms = aggregate(&[whole], Unit::Millisecond).unwrap();
    let chunk_ms = aggregate(&chunks, Unit::Millisecond).unwrap();

    // Chunks are closed ranges 1 ms apart; each boundary accounts for 1 ms.
    let boundaries = (chunks.len() - 1) as f64;
    assert_eq!(chunk_ms + boundaries, whole_ms);
}
