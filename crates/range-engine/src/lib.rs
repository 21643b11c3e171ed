//! # range-engine
//!
//! Timezone-aware temporal range computation.
//!
//! The engine generates fixed-interval recurrences, intersects, merges and splits
//! ranges, sums their durations, resolves business days against a holiday set,
//! and lays out constrained appointment slots. Everything is a pure, synchronous
//! function over caller-supplied values: no clock access (except
//! [`Instant::now`]), no shared state, no I/O.
//!
//! Every loop is guarded twice: its step size is checked to be positive before
//! the loop starts, and its output is capped by [`EngineOptions`].
//!
//! ## Modules
//!
//! - [`instant`] — `Instant`, `Zone`, `DateInput` and the calendar primitives
//! - [`unit`] — calendar units and week-start convention
//! - [`range`] — closed ranges, intersection, overlap, merging
//! - [`splitter`] — unit-aligned chunking of a range
//! - [`aggregate`] — total duration of a set of ranges
//! - [`recurrence`] — every N units from start through end
//! - [`business`] — next/previous business day, business-day arithmetic
//! - [`slots`] — appointment slots under weekday and daily-window constraints
//! - [`convert`] — batch reformatting into a target zone
//! - [`config`] — engine options
//! - [`error`] — error types

pub mod aggregate;
pub mod business;
pub mod config;
pub mod convert;
pub mod error;
pub mod instant;
pub mod range;
pub mod recurrence;
pub mod slots;
pub mod splitter;
pub mod unit;

pub use aggregate::aggregate;
pub use business::{next_business_day, BusinessCalendar, HolidaySet};
pub use config::EngineOptions;
pub use convert::{convert_all, BatchConversion, RejectedInput};
pub use error::RangeError;
pub use instant::{resolve_instant, DateInput, Instant, Zone};
pub use range::{intersect, merge_ranges, overlaps, Range, RangeInput};
pub use recurrence::generate;
pub use slots::{generate_slots, DailyWindow, SlotConstraints};
pub use splitter::split;
pub use unit::{Unit, WeekStartDay};
