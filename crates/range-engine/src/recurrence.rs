//! Fixed-interval recurrence: every `interval` units from `start` through `end`.
//!
//! Occurrence *k* is `start + k·interval units`, computed from the anchor rather
//! than by repeatedly stepping the previous occurrence. For fixed-length units the
//! two are identical. For months and years anchoring keeps the day of month
//! stable: a series starting on Jan 31 yields Feb 28, then Mar 31, instead of
//! drifting to the 28th forever.

use tracing::debug;

use crate::config::EngineOptions;
use crate::error::{RangeError, Result};
use crate::instant::{resolve_instant, DateInput, Instant, Zone};
use crate::unit::Unit;

/// Generate the occurrences of a periodic event between `start` and `end`,
/// both inclusive, using default options.
///
/// # Arguments
/// - `start` -- First occurrence (any [`DateInput`] representation)
/// - `end` -- Inclusive upper bound
/// - `unit` -- Step unit
/// - `interval` -- Units between occurrences; must be positive
/// - `timezone` -- Optional IANA zone; both endpoints are normalized into it and
///   day-or-larger steps follow its wall clock
///
/// Returns an empty list when `start > end`.
///
/// Occurrences are anchored at `start` (`start + k·interval`), not stepped from
/// the previous one, so a monthly series from Jan 31 runs Jan 31, Feb 28, Mar 31
/// rather than settling on the 28th.
///
/// # Errors
/// Returns [`RangeError::NonPositiveStep`] if `interval` is zero,
/// [`RangeError::InvalidTimezone`] for an unknown zone,
/// [`RangeError::InvalidDatetime`] if either endpoint cannot be resolved, and
/// [`RangeError::LimitExceeded`] if more than `max_items` occurrences would be
/// produced.
pub fn generate(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    unit: Unit,
    interval: u32,
    timezone: Option<&str>,
) -> Result<Vec<Instant>> {
    generate_with_options(
        start,
        end,
        unit,
        interval,
        timezone,
        &EngineOptions::default(),
    )
}

/// [`generate`] with explicit options.
pub fn generate_with_options(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    unit: Unit,
    interval: u32,
    timezone: Option<&str>,
    options: &EngineOptions,
) -> Result<Vec<Instant>> {
    if interval == 0 {
        return Err(RangeError::NonPositiveStep("interval"));
    }
    let zone = Zone::optional(timezone)?;
    let start = resolve_instant(&start.into(), zone)?;
    let end = resolve_instant(&end.into(), zone)?;

    if start > end {
        debug!(%start, %end, "start is after end, no occurrences");
        return Ok(Vec::new());
    }

    let step = i64::from(interval);
    let mut occurrences = vec![start];
    let mut k: i64 = 1;
    loop {
        let next = start.add(k * step, unit)?;
        if next > end {
            break;
        }
        if occurrences.len() >= options.max_items {
            return Err(RangeError::LimitExceeded {
                limit: options.max_items,
            });
        }
        occurrences.push(next);
        k += 1;
    }

    debug!(%unit, interval, count = occurrences.len(), "generated occurrences");
    Ok(occurrences)
}
