//! Total duration of a collection of ranges.

use tracing::debug;

use crate::error::Result;
use crate::range::Range;
use crate::unit::Unit;

/// Sum the durations of `ranges`, expressed in `unit` with fractional precision.
///
/// An empty slice sums to `0.0`. Every range is validated before anything is
/// summed: a single inverted range fails the whole call. Day and week durations
/// are wall-clock durations in each range's start zone; month and year durations
/// follow calendar month lengths (see [`crate::instant::Instant::diff`]).
///
/// # Errors
/// Returns [`crate::RangeError::InvertedRange`] for the first range with
/// `start > end`.
pub fn aggregate(ranges: &[Range], unit: Unit) -> Result<f64> {
    for range in ranges {
        range.validate()?;
    }

    let mut total = 0.0;
    for range in ranges {
        total += range.end.with_zone(range.start.zone()).diff(&range.start, unit, true)?;
    }

    debug!(ranges = ranges.len(), %unit, total, "aggregated ranges");
    Ok(total)
}
