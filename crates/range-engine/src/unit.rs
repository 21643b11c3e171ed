//! Calendar units and week conventions.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// A calendar granularity used for arithmetic, truncation and differences.
///
/// Units up to `Hour` are absolute durations. `Day` and `Week` follow the
/// wall clock of the instant's zone, and `Month`/`Year` have variable length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// Length of the unit in milliseconds, for units that are absolute durations.
    pub(crate) fn absolute_millis(self) -> Option<i64> {
        match self {
            Unit::Millisecond => Some(1),
            Unit::Second => Some(1_000),
            Unit::Minute => Some(60_000),
            Unit::Hour => Some(3_600_000),
            _ => None,
        }
    }

    /// Nominal length in milliseconds for `Day` and `Week` on the wall clock.
    pub(crate) fn wall_clock_millis(self) -> Option<i64> {
        match self {
            Unit::Day => Some(86_400_000),
            Unit::Week => Some(7 * 86_400_000),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Millisecond => "millisecond",
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
            Unit::Year => "year",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = RangeError;

    /// Accepts singular, plural and short forms. `M` is month and `m` is minute.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s {
            "M" => Unit::Month,
            "m" => Unit::Minute,
            _ => match s.to_ascii_lowercase().as_str() {
                "ms" | "millisecond" | "milliseconds" => Unit::Millisecond,
                "s" | "sec" | "second" | "seconds" => Unit::Second,
                "min" | "minute" | "minutes" => Unit::Minute,
                "h" | "hour" | "hours" => Unit::Hour,
                "d" | "day" | "days" => Unit::Day,
                "w" | "week" | "weeks" => Unit::Week,
                "month" | "months" => Unit::Month,
                "y" | "year" | "years" => Unit::Year,
                _ => return Err(RangeError::InvalidUnit(s.to_string())),
            },
        };
        Ok(unit)
    }
}

// ── Configurable week start ─────────────────────────────────────────────────

/// Which day begins a week for `Unit::Week` truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// US convention, and the weekday numbering used throughout (0 = Sunday).
    #[default]
    Sunday,
    /// ISO 8601 convention.
    Monday,
}

impl WeekStartDay {
    /// How many days `weekday` is from the week-start day.
    pub(crate) fn days_since_start(self, weekday: Weekday) -> i64 {
        match self {
            WeekStartDay::Sunday => weekday.num_days_from_sunday() as i64,
            WeekStartDay::Monday => weekday.num_days_from_monday() as i64,
        }
    }
}
