//! Closed ranges of instants and the algebra over them.
//!
//! A [`Range`] is the closed interval `[start, end]`. It is valid iff
//! `start <= end`; every operation here rejects an inverted range with
//! [`RangeError::InvertedRange`] instead of swapping its endpoints.
//! A zero-length range (`start == end`) is valid.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RangeError, Result};
use crate::instant::{resolve_instant, DateInput, Instant, Zone};

/// A closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Instant,
    pub end: Instant,
}

impl Range {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: Instant, end: Instant) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(RangeError::InvertedRange {
                start: self.start.to_string(),
                end: self.end.to_string(),
            })
        }
    }

    /// Whether `instant` lies within `[start, end]`, both ends inclusive.
    pub fn contains(&self, instant: &Instant) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    pub fn duration_millis(&self) -> i64 {
        (self.end.utc() - self.start.utc()).num_milliseconds()
    }
}

/// A range whose endpoints have not been resolved yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RangeInput {
    pub start: DateInput,
    pub end: DateInput,
}

impl RangeInput {
    pub fn new(start: impl Into<DateInput>, end: impl Into<DateInput>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Resolve both endpoints (in `zone` when given) and validate the result.
    pub fn resolve(&self, zone: Option<Zone>) -> Result<Range> {
        let start = resolve_instant(&self.start, zone)?;
        let end = resolve_instant(&self.end, zone)?;
        Range::new(start, end)
    }
}

/// Intersect two ranges.
///
/// Returns `Ok(None)` when the ranges are disjoint. Ranges that touch at a single
/// instant intersect in the zero-length range at that instant. The operation is
/// symmetric: `intersect(a, b) == intersect(b, a)`.
///
/// # Errors
/// Returns [`RangeError::InvertedRange`] if either range has `start > end`.
pub fn intersect(a: &Range, b: &Range) -> Result<Option<Range>> {
    a.validate()?;
    b.validate()?;

    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    if start > end {
        debug!(%start, %end, "ranges are disjoint");
        return Ok(None);
    }
    Ok(Some(Range { start, end }))
}

/// Whether two closed ranges share at least one instant.
pub fn overlaps(a: &Range, b: &Range) -> Result<bool> {
    Ok(intersect(a, b)?.is_some())
}

/// Coalesce overlapping or touching ranges into a sorted, disjoint list.
///
/// Validation is all-or-nothing: one inverted range fails the whole call.
pub fn merge_ranges(ranges: &[Range]) -> Result<Vec<Range>> {
    for range in ranges {
        range.validate()?;
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    debug!(input = ranges.len(), merged = merged.len(), "merged ranges");
    Ok(merged)
}
