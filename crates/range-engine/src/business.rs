//! Business-day resolution against weekends and a holiday set.
//!
//! Holidays are compared by local year-month-day only: `2025-12-25`,
//! `2025-12-25T18:00:00Z` and `2025-12-25T23:00:00-05:00` all mark the same
//! date, each read in its own zone.
//!
//! ```
//! use range_engine::business::next_business_day;
//!
//! // Friday → Monday
//! let next = next_business_day("2025-06-06", Vec::<&str>::new()).unwrap();
//! assert_eq!(next.date_key().to_string(), "2025-06-09");
//! ```

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::EngineOptions;
use crate::error::{RangeError, Result};
use crate::instant::{resolve_instant, DateInput, Instant};
use crate::unit::Unit;

/// Saturday and Sunday, in 0 = Sunday numbering.
pub const DEFAULT_WEEKEND: [u8; 2] = [0, 6];

/// Local calendar dates that are never business days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    /// Resolve every holiday to its date key. Any unresolvable entry fails the set.
    pub fn new<I, D>(holidays: I) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<DateInput>,
    {
        let dates = holidays
            .into_iter()
            .map(|h| resolve_instant(&h.into(), None).map(|instant| instant.date_key()))
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { dates })
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A weekend mask plus holidays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessCalendar {
    holidays: HolidaySet,
    weekend: BTreeSet<u8>,
    max_lookahead_days: u32,
}

impl BusinessCalendar {
    /// A Saturday/Sunday weekend calendar with the given holidays.
    pub fn new(holidays: HolidaySet) -> Self {
        Self {
            holidays,
            weekend: DEFAULT_WEEKEND.into_iter().collect(),
            max_lookahead_days: EngineOptions::default().max_lookahead_days,
        }
    }

    /// Replace the weekend days (0 = Sunday … 6 = Saturday).
    pub fn with_weekend(mut self, weekend: &[u8]) -> Result<Self> {
        if let Some(&bad) = weekend.iter().find(|&&d| d > 6) {
            return Err(RangeError::InvalidWeekday(bad));
        }
        self.weekend = weekend.iter().copied().collect();
        Ok(self)
    }

    pub fn with_options(mut self, options: &EngineOptions) -> Self {
        self.max_lookahead_days = options.max_lookahead_days;
        self
    }

    pub fn is_business_day(&self, instant: &Instant) -> bool {
        !self.weekend.contains(&instant.weekday()) && !self.holidays.contains(&instant.date_key())
    }

    /// The first business day strictly after `date`, keeping its time of day.
    ///
    /// Not idempotent: calling it on a business day still moves forward.
    ///
    /// # Errors
    /// Returns [`RangeError::InvalidDatetime`] if `date` cannot be resolved and
    /// [`RangeError::NoBusinessDay`] if none is found within `max_lookahead_days`.
    pub fn next_business_day(&self, date: impl Into<DateInput>) -> Result<Instant> {
        let date = resolve_instant(&date.into(), None)?;
        self.step_to_business_day(&date, 1)
    }

    /// The last business day strictly before `date`, keeping its time of day.
    pub fn previous_business_day(&self, date: impl Into<DateInput>) -> Result<Instant> {
        let date = resolve_instant(&date.into(), None)?;
        self.step_to_business_day(&date, -1)
    }

    /// Move `days` business days after `date`.
    ///
    /// # Errors
    /// Returns [`RangeError::NonPositiveStep`] if `days` is zero.
    pub fn add_business_days(&self, date: impl Into<DateInput>, days: u32) -> Result<Instant> {
        if days == 0 {
            return Err(RangeError::NonPositiveStep("days"));
        }
        let mut current = resolve_instant(&date.into(), None)?;
        for _ in 0..days {
            current = self.step_to_business_day(&current, 1)?;
        }
        Ok(current)
    }

    fn step_to_business_day(&self, date: &Instant, direction: i64) -> Result<Instant> {
        let mut candidate = date.add(direction, Unit::Day)?;
        let mut scanned: u32 = 1;
        while !self.is_business_day(&candidate) {
            if scanned >= self.max_lookahead_days {
                return Err(RangeError::NoBusinessDay {
                    date: date.to_string(),
                    days: self.max_lookahead_days,
                });
            }
            candidate = candidate.add(direction, Unit::Day)?;
            scanned += 1;
        }
        debug!(from = %date, to = %candidate, scanned, "resolved business day");
        Ok(candidate)
    }
}

/// The first business day strictly after `date`, skipping Saturdays, Sundays and
/// `holidays`.
///
/// # Errors
/// Returns [`RangeError::InvalidDatetime`] if `date` or any holiday cannot be
/// resolved.
pub fn next_business_day<I, D>(date: impl Into<DateInput>, holidays: I) -> Result<Instant>
where
    I: IntoIterator<Item = D>,
    D: Into<DateInput>,
{
    next_business_day_with_options(date, holidays, &EngineOptions::default())
}

/// [`next_business_day`] with explicit options (`max_lookahead_days`).
pub fn next_business_day_with_options<I, D>(
    date: impl Into<DateInput>,
    holidays: I,
    options: &EngineOptions,
) -> Result<Instant>
where
    I: IntoIterator<Item = D>,
    D: Into<DateInput>,
{
    BusinessCalendar::new(HolidaySet::new(holidays)?)
        .with_options(options)
        .next_business_day(date)
}
