//! Equal-length appointment slots inside a range, constrained by excluded
//! weekdays and a daily time-of-day window.
//!
//! Days are walked in the local calendar of the requested zone (or of `start`'s
//! zone when none is given). Two independent gates drop a whole day: its weekday
//! is excluded, or its window opens after the overall `end`. Within a day, slots
//! are laid on a grid anchored at the window start. A slot is kept only if it
//! lies entirely inside both the day's window and `[start, end]`. Slots are
//! never partial.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineOptions;
use crate::error::{RangeError, Result};
use crate::instant::{resolve_instant, DateInput, Instant, Zone};
use crate::range::Range;
use crate::unit::Unit;

/// A time-of-day window applied to every day, e.g. `09:00`–`17:00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyWindow {
    /// Opening time, `HH:MM` or `HH:MM:SS`.
    pub start: String,
    /// Closing time, `HH:MM` or `HH:MM:SS`.
    pub end: String,
}

impl Default for DailyWindow {
    fn default() -> Self {
        Self {
            start: "00:00".to_string(),
            end: "23:59".to_string(),
        }
    }
}

impl DailyWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parse both ends, rejecting a window that closes before it opens.
    pub fn times(&self) -> Result<(NaiveTime, NaiveTime)> {
        let open = parse_time_of_day(&self.start)?;
        let close = parse_time_of_day(&self.end)?;
        if open > close {
            return Err(RangeError::InvertedWindow {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }
        Ok((open, close))
    }
}

/// Constraints applied while generating slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConstraints {
    /// Weekdays that get no slots (0 = Sunday … 6 = Saturday).
    #[serde(alias = "excludedWeekdays")]
    pub excluded_weekdays: Vec<u8>,
    #[serde(alias = "dailyWindow")]
    pub daily_window: DailyWindow,
}

impl SlotConstraints {
    pub fn excluding_weekdays(mut self, weekdays: &[u8]) -> Self {
        self.excluded_weekdays = weekdays.to_vec();
        self
    }

    /// Exclude Saturday and Sunday.
    pub fn excluding_weekends(self) -> Self {
        self.excluding_weekdays(&[0, 6])
    }

    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.daily_window = DailyWindow::new(start, end);
        self
    }

    fn excluded_set(&self) -> Result<BTreeSet<u8>> {
        if let Some(&bad) = self.excluded_weekdays.iter().find(|&&d| d > 6) {
            return Err(RangeError::InvalidWeekday(bad));
        }
        Ok(self.excluded_weekdays.iter().copied().collect())
    }
}

fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| RangeError::InvalidTimeOfDay(format!("'{}'", s)))
}

/// Generate slots of `slot_minutes` between `start` and `end`, using default options.
///
/// Returns an empty list when `start > end`.
///
/// # Errors
/// All checked before any day is visited:
/// [`RangeError::NonPositiveStep`] if `slot_minutes` is zero,
/// [`RangeError::InvalidTimezone`] for an unknown zone,
/// [`RangeError::InvalidWeekday`] for an excluded weekday outside `0..=6`,
/// [`RangeError::InvalidTimeOfDay`] / [`RangeError::InvertedWindow`] for a bad
/// window, and [`RangeError::InvalidDatetime`] for unresolvable endpoints.
pub fn generate_slots(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    slot_minutes: u32,
    constraints: &SlotConstraints,
    timezone: Option<&str>,
) -> Result<Vec<Range>> {
    generate_slots_with_options(
        start,
        end,
        slot_minutes,
        constraints,
        timezone,
        &EngineOptions::default(),
    )
}

/// [`generate_slots`] with explicit options (`max_items`).
pub fn generate_slots_with_options(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    slot_minutes: u32,
    constraints: &SlotConstraints,
    timezone: Option<&str>,
    options: &EngineOptions,
) -> Result<Vec<Range>> {
    if slot_minutes == 0 {
        return Err(RangeError::NonPositiveStep("slot_minutes"));
    }
    let zone = Zone::optional(timezone)?;
    let excluded = constraints.excluded_set()?;
    let (open, close) = constraints.daily_window.times()?;
    let start = resolve_instant(&start.into(), zone)?;
    let end = resolve_instant(&end.into(), zone)?;

    if start > end {
        debug!(%start, %end, "start is after end, no slots");
        return Ok(Vec::new());
    }

    let day_zone = start.zone();
    let last_day = end.with_zone(day_zone).date_key();
    let mut day = start.date_key();
    let mut slots = Vec::new();

    while day <= last_day {
        let weekday = day.weekday().num_days_from_sunday() as u8;
        if !excluded.contains(&weekday) {
            let day_start = Instant::from_local(day.and_time(open), day_zone)?;
            let day_end = Instant::from_local(day.and_time(close), day_zone)?;
            if day_start <= end {
                let window = DaySlots {
                    range: Range { start, end },
                    day_end,
                    slot_minutes: i64::from(slot_minutes),
                    max_items: options.max_items,
                };
                window.fill(day_start, &mut slots)?;
            }
        }
        day = next_day(day)?;
    }

    debug!(
        slot_minutes,
        excluded = ?excluded,
        count = slots.len(),
        "generated slots"
    );
    Ok(slots)
}

struct DaySlots {
    range: Range,
    day_end: Instant,
    slot_minutes: i64,
    max_items: usize,
}

impl DaySlots {
    fn fill(&self, day_start: Instant, slots: &mut Vec<Range>) -> Result<()> {
        let mut slot_start = day_start;
        loop {
            let slot_end = slot_start.add(self.slot_minutes, Unit::Minute)?;
            if slot_end > self.day_end || slot_end > self.range.end {
                return Ok(());
            }
            if slot_start >= self.range.start {
                if slots.len() >= self.max_items {
                    return Err(RangeError::LimitExceeded {
                        limit: self.max_items,
                    });
                }
                slots.push(Range {
                    start: slot_start,
                    end: slot_end,
                });
            }
            slot_start = slot_end;
        }
    }
}

fn next_day(day: NaiveDate) -> Result<NaiveDate> {
    day.succ_opt()
        .ok_or_else(|| RangeError::Overflow(format!("day after {}", day)))
}
