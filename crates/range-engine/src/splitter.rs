//! Partition a range into unit-aligned, contiguous chunks.
//!
//! Each chunk covers `chunk_size` units. The first chunk starts exactly at the
//! range start. Each chunk ends on the last millisecond of its final unit,
//! except the last chunk, which is clipped to the range end. The next chunk
//! starts 1 ms after the previous one ends, so consecutive chunks never overlap
//! or leave a gap and together cover the range exactly.
//!
//! In zones whose offset changes by a fraction of the unit (a 30-minute DST
//! shift split by hours), a chunk boundary follows the wall clock from before
//! the transition, so one chunk around the transition is shorter than a unit.

use tracing::debug;

use crate::config::EngineOptions;
use crate::error::{RangeError, Result};
use crate::range::Range;
use crate::unit::Unit;

/// Split `range` into chunks of `chunk_size` units, using default options.
///
/// # Errors
/// Returns [`RangeError::NonPositiveStep`] if `chunk_size` is zero,
/// [`RangeError::InvertedRange`] if `range.start > range.end`, and
/// [`RangeError::LimitExceeded`] if more than `max_items` chunks would be produced.
pub fn split(range: &Range, unit: Unit, chunk_size: u32) -> Result<Vec<Range>> {
    split_with_options(range, unit, chunk_size, &EngineOptions::default())
}

/// [`split`] with explicit options (`max_items`, `week_start`).
pub fn split_with_options(
    range: &Range,
    unit: Unit,
    chunk_size: u32,
    options: &EngineOptions,
) -> Result<Vec<Range>> {
    if chunk_size == 0 {
        return Err(RangeError::NonPositiveStep("chunk_size"));
    }
    range.validate()?;

    let size = i64::from(chunk_size);
    let mut chunks = Vec::new();
    let mut cursor = range.start;

    loop {
        let tentative_end = cursor
            .add(size - 1, unit)?
            .end_of_with(unit, options.week_start)?
            .max(cursor);
        if tentative_end >= range.end {
            chunks.push(Range {
                start: cursor,
                end: range.end,
            });
            break;
        }
        chunks.push(Range {
            start: cursor,
            end: tentative_end,
        });
        if chunks.len() >= options.max_items {
            return Err(RangeError::LimitExceeded {
                limit: options.max_items,
            });
        }
        cursor = tentative_end.add(1, Unit::Millisecond)?;
    }

    debug!(%unit, chunk_size, chunks = chunks.len(), "split range");
    Ok(chunks)
}
