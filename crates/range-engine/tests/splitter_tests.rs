//! Tests for unit-aligned range splitting.

use range_engine::config::EngineOptions;
use range_engine::splitter::split_with_options;
use range_engine::{
    resolve_instant, split, Instant, Range, RangeError, Unit, WeekStartDay, Zone,
};

fn at(s: &str) -> Instant {
    resolve_instant(&s.into(), None).unwrap()
}

fn range(start: &str, end: &str) -> Range {
    Range::new(at(start), at(end)).unwrap()
}

fn range_in(start: &str, end: &str, zone: &str) -> Range {
    let zone = Some(Zone::named(zone).unwrap());
    Range::new(
        resolve_instant(&start.into(), zone).unwrap(),
        resolve_instant(&end.into(), zone).unwrap(),
    )
    .unwrap()
}

fn assert_one_ms_apart(chunks: &[Range]) {
    for pair in chunks.windows(2) {
        assert_eq!(
            pair[1].start.timestamp_millis() - pair[0].end.timestamp_millis(),
            1,
            "chunks {:?} and {:?} are not adjacent",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn daily_chunks_align_to_day_boundaries() {
    let chunks = split(
        &range("2025-06-10T15:00:00Z", "2025-06-13T10:00:00Z"),
        Unit::Day,
        1,
    )
    .unwrap();

    assert_eq!(
        chunks,
        vec![
            range("2025-06-10T15:00:00Z", "2025-06-10T23:59:59.999Z"),
            range("2025-06-11T00:00:00Z", "2025-06-11T23:59:59.999Z"),
            range("2025-06-12T00:00:00Z", "2025-06-12T23:59:59.999Z"),
            range("2025-06-13T00:00:00Z", "2025-06-13T10:00:00Z"),
        ]
    );
}

#[test]
fn multi_unit_chunks() {
    let chunks = split(
        &range("2025-06-10T15:00:00Z", "2025-06-13T10:00:00Z"),
        Unit::Day,
        2,
    )
    .unwrap();

    assert_eq!(
        chunks,
        vec![
            range("2025-06-10T15:00:00Z", "2025-06-11T23:59:59.999Z"),
            range("2025-06-12T00:00:00Z", "2025-06-13T10:00:00Z"),
        ]
    );
}

#[test]
fn monthly_chunks_follow_month_lengths() {
    let chunks = split(&range("2025-01-15", "2025-03-10"), Unit::Month, 1).unwrap();

    assert_eq!(
        chunks,
        vec![
            range("2025-01-15", "2025-01-31T23:59:59.999Z"),
            range("2025-02-01", "2025-02-28T23:59:59.999Z"),
            range("2025-03-01", "2025-03-10"),
        ]
    );
}

#[test]
fn range_ending_on_unit_boundary_does_not_emit_empty_tail() {
    let chunks = split(
        &range("2025-06-10", "2025-06-11T23:59:59.999Z"),
        Unit::Day,
        1,
    )
    .unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1], range("2025-06-11", "2025-06-11T23:59:59.999Z"));
}

#[test]
fn zero_length_range_is_one_chunk() {
    let r = range("2025-06-10T12:00:00Z", "2025-06-10T12:00:00Z");
    assert_eq!(split(&r, Unit::Hour, 1).unwrap(), vec![r]);
}

#[test]
fn range_shorter_than_a_chunk_is_returned_whole() {
    let r = range("2025-06-10T12:00:00Z", "2025-06-10T18:00:00Z");
    assert_eq!(split(&r, Unit::Week, 1).unwrap(), vec![r]);
}

#[test]
fn weekly_chunks_respect_week_start() {
    // 2025-06-11 is a Wednesday.
    let r = range("2025-06-11", "2025-06-20");

    let sunday = split(&r, Unit::Week, 1).unwrap();
    assert_eq!(sunday[0].end, at("2025-06-14T23:59:59.999Z"));
    assert_eq!(sunday[1].start, at("2025-06-15"));

    let options = EngineOptions {
        week_start: WeekStartDay::Monday,
        ..EngineOptions::default()
    };
    let monday = split_with_options(&r, Unit::Week, 1, &options).unwrap();
    assert_eq!(monday[0].end, at("2025-06-15T23:59:59.999Z"));
    assert_eq!(monday[1].start, at("2025-06-16"));
}

#[test]
fn chunks_are_contiguous_and_cover_the_range() {
    let r = range("2025-01-15T08:30:00Z", "2025-07-04T17:45:00Z");
    let chunks = split(&r, Unit::Month, 2).unwrap();

    assert_eq!(chunks.first().unwrap().start, r.start);
    assert_eq!(chunks.last().unwrap().end, r.end);
    for pair in chunks.windows(2) {
        assert_eq!(pair[1].start.utc() - pair[0].end.utc(), chrono::Duration::milliseconds(1));
    }
}

#[test]
fn zero_chunk_size_is_rejected() {
    let err = split(&range("2025-06-10", "2025-06-11"), Unit::Day, 0).unwrap_err();
    assert_eq!(err, RangeError::NonPositiveStep("chunk_size"));
}

#[test]
fn inverted_range_is_rejected() {
    let r = Range {
        start: at("2025-06-11"),
        end: at("2025-06-10"),
    };
    assert!(matches!(
        split(&r, Unit::Day, 1),
        Err(RangeError::InvertedRange { .. })
    ));
}

#[test]
fn max_items_caps_chunk_count() {
    let options = EngineOptions {
        max_items: 10,
        ..EngineOptions::default()
    };
    let err = split_with_options(
        &range("2025-06-10", "2025-06-30"),
        Unit::Day,
        1,
        &options,
    )
    .unwrap_err();
    assert_eq!(err, RangeError::LimitExceeded { limit: 10 });
}

// ---------------------------------------------------------------------------
// Zones with fractional DST shifts
// ---------------------------------------------------------------------------

#[test]
fn hourly_chunks_stay_adjacent_across_half_hour_fall_back() {
    // Lord Howe Island falls back from +11:00 to +10:30 at 02:00 local on 2025-04-06.
    let r = range_in("2025-04-06T00:00:00", "2025-04-06T03:45:00", "Australia/Lord_Howe");
    let chunks = split(&r, Unit::Hour, 1).unwrap();

    assert_one_ms_apart(&chunks);
    assert_eq!(
        chunks,
        vec![
            range("2025-04-05T13:00:00Z", "2025-04-05T13:59:59.999Z"),
            range("2025-04-05T14:00:00Z", "2025-04-05T14:59:59.999Z"),
            range("2025-04-05T15:00:00Z", "2025-04-05T15:29:59.999Z"),
            range("2025-04-05T15:30:00Z", "2025-04-05T16:29:59.999Z"),
            range("2025-04-05T16:30:00Z", "2025-04-05T17:15:00Z"),
        ]
    );
}

#[test]
fn hourly_chunks_stay_adjacent_across_half_hour_spring_forward() {
    // Lord Howe Island springs forward from +10:30 to +11:00 at 02:00 local on 2025-10-05.
    let r = range_in("2025-10-05T01:00:00", "2025-10-05T03:15:00", "Australia/Lord_Howe");
    let chunks = split(&r, Unit::Hour, 1).unwrap();

    assert_one_ms_apart(&chunks);
    assert_eq!(
        chunks,
        vec![
            range("2025-10-04T14:30:00Z", "2025-10-04T15:29:59.999Z"),
            range("2025-10-04T15:30:00Z", "2025-10-04T15:59:59.999Z"),
            range("2025-10-04T16:00:00Z", "2025-10-04T16:15:00Z"),
        ]
    );
}

#[test]
fn daily_chunks_follow_local_midnight_across_dst() {
    // New York springs forward on 2025-03-09, a 23-hour day.
    let r = range_in("2025-03-08T12:00:00", "2025-03-10T12:00:00", "America/New_York");
    let chunks = split(&r, Unit::Day, 1).unwrap();

    assert_one_ms_apart(&chunks);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].start.to_rfc3339(), "2025-03-09T00:00:00-05:00");
    assert_eq!(chunks[2].start.to_rfc3339(), "2025-03-10T00:00:00-04:00");
    assert_eq!(chunks[1].duration_millis(), 23 * 3_600_000 - 1);
}
