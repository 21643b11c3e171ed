//! Immutable, timezone-aware instants and the calendar primitives the engine
//! is built on.
//!
//! An [`Instant`] is an absolute point in time (millisecond precision) bound to a
//! [`Zone`]. Ordering and equality look only at the absolute point; the zone
//! decides wall-clock views: local date, weekday, day boundaries and
//! calendar arithmetic.
//!
//! Loose inputs (RFC 3339 strings, naive local strings, epoch milliseconds,
//! chrono values) are carried as a [`DateInput`] and normalized exactly once by
//! [`resolve_instant`] at each operation's boundary.
//!
//! # Local time resolution
//!
//! Wall-clock times that do not exist in a zone (the DST "spring forward" gap)
//! are shifted forward by the length of the gap, so 02:30 on a 02:00→03:00
//! transition day becomes 03:30. Wall-clock times that occur twice (the
//! "fall back" overlap) resolve to the earlier instant.

use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, SecondsFormat, SubsecRound, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{RangeError, Result};
use crate::unit::{Unit, WeekStartDay};

/// Naive (offset-less) datetime layouts accepted by [`resolve_instant`].
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ── Zone ────────────────────────────────────────────────────────────────────

/// The zone an instant is viewed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// An IANA zone with its DST rules.
    Named(Tz),
    /// A fixed UTC offset, as carried by an RFC 3339 string like `+02:00`.
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Named(Tz::UTC)
    }

    /// Look up an IANA timezone name.
    pub fn named(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| RangeError::InvalidTimezone(format!("'{}'", name)))
    }

    /// Whether `name` is a recognized IANA timezone.
    pub fn exists(name: &str) -> bool {
        name.parse::<Tz>().is_ok()
    }

    /// Resolve an optional zone argument, failing on an unknown name.
    pub fn optional(name: Option<&str>) -> Result<Option<Self>> {
        name.map(Zone::named).transpose()
    }

    /// The UTC offset in force at `utc`.
    pub fn offset_at(&self, utc: &DateTime<Utc>) -> FixedOffset {
        match self {
            Zone::Named(tz) => tz.offset_from_utc_datetime(&utc.naive_utc()).fix(),
            Zone::Fixed(offset) => *offset,
        }
    }

    fn to_local(&self, utc: &DateTime<Utc>) -> NaiveDateTime {
        utc.with_timezone(&self.offset_at(utc)).naive_local()
    }

    fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        let out_of_range = || RangeError::Overflow(format!("local time {} in {}", local, self));
        match self {
            Zone::Fixed(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(out_of_range),
            Zone::Named(tz) => {
                if let Some(dt) = tz.from_local_datetime(&local).earliest() {
                    return Ok(dt.with_timezone(&Utc));
                }
                // Inside a DST gap: apply the offset in force before the transition.
                let before = local
                    .checked_sub_signed(Duration::days(1))
                    .map(|probe| tz.offset_from_utc_datetime(&probe).fix())
                    .ok_or_else(out_of_range)?;
                local
                    .checked_sub_signed(Duration::seconds(before.local_minus_utc() as i64))
                    .map(|naive_utc| naive_utc.and_utc())
                    .ok_or_else(out_of_range)
            }
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Named(tz) => f.write_str(tz.name()),
            Zone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

// ── Instant ─────────────────────────────────────────────────────────────────

/// An immutable point in calendar time, bound to a zone.
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    utc: DateTime<Utc>,
    zone: Zone,
}

impl Instant {
    /// Build an instant from an absolute time. Sub-millisecond precision is dropped.
    pub fn from_utc(utc: DateTime<Utc>, zone: Zone) -> Self {
        Self {
            utc: utc.trunc_subsecs(3),
            zone,
        }
    }

    /// Build an instant from a wall-clock time in `zone`.
    pub fn from_local(local: NaiveDateTime, zone: Zone) -> Result<Self> {
        Ok(Self::from_utc(zone.to_utc(local)?, zone))
    }

    /// The current system time, in UTC.
    pub fn now() -> Self {
        Self::from_utc(Utc::now(), Zone::utc())
    }

    /// Parse `text` with an explicit `strftime` pattern.
    ///
    /// Patterns carrying an offset (`%z`, `%:z`) produce an absolute instant that is
    /// then converted into `zone`. Offset-less patterns are read as wall-clock time
    /// in `zone` (UTC when `None`), and date-only patterns as local midnight.
    pub fn parse_with_format(text: &str, pattern: &str, zone: Option<Zone>) -> Result<Self> {
        if let Ok(dt) = DateTime::parse_from_str(text, pattern) {
            return Ok(Instant::from(dt).in_zone(zone));
        }
        let local_zone = zone.unwrap_or_else(Zone::utc);
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Self::from_local(naive, local_zone);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, pattern) {
            return Self::from_local(midnight(date), local_zone);
        }
        Err(RangeError::InvalidDatetime(format!(
            "'{}' does not match pattern '{}'",
            text, pattern
        )))
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The wall-clock reading of this instant in its zone.
    pub fn local(&self) -> NaiveDateTime {
        self.zone.to_local(&self.utc)
    }

    pub fn offset(&self) -> FixedOffset {
        self.zone.offset_at(&self.utc)
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.utc.timestamp_millis()
    }

    /// The same instant viewed in another zone.
    pub fn with_zone(&self, zone: Zone) -> Self {
        Self {
            utc: self.utc,
            zone,
        }
    }

    fn in_zone(self, zone: Option<Zone>) -> Self {
        zone.map_or(self, |z| self.with_zone(z))
    }

    /// Local weekday, 0 = Sunday through 6 = Saturday.
    pub fn weekday(&self) -> u8 {
        self.local().weekday().num_days_from_sunday() as u8
    }

    /// The local year-month-day of this instant in its own zone.
    pub fn date_key(&self) -> NaiveDate {
        self.local().date()
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    /// Advance by `amount` units (negative amounts move backwards).
    ///
    /// Sub-day units are absolute durations. Days and weeks keep the wall-clock
    /// time of day across DST changes. Months and years clamp the day of month,
    /// so Jan 31 + 1 month is the last day of February.
    pub fn add(&self, amount: i64, unit: Unit) -> Result<Self> {
        let overflow = || RangeError::Overflow(format!("{} + {} {}(s)", self, amount, unit));
        let local = self.local();
        let shifted = match unit {
            Unit::Millisecond => return self.shift_millis(Some(amount)).ok_or_else(overflow),
            Unit::Second => return self.shift_millis(amount.checked_mul(1_000)).ok_or_else(overflow),
            Unit::Minute => return self.shift_millis(amount.checked_mul(60_000)).ok_or_else(overflow),
            Unit::Hour => {
                return self
                    .shift_millis(amount.checked_mul(3_600_000))
                    .ok_or_else(overflow)
            }
            Unit::Day => shift_days(local, Some(amount)),
            Unit::Week => shift_days(local, amount.checked_mul(7)),
            Unit::Month => shift_months(local, Some(amount)),
            Unit::Year => shift_months(local, amount.checked_mul(12)),
        }
        .ok_or_else(overflow)?;
        Self::from_local(shifted, self.zone)
    }

    /// Move back by `amount` units. Symmetric with [`Instant::add`].
    pub fn subtract(&self, amount: i64, unit: Unit) -> Result<Self> {
        let negated = amount
            .checked_neg()
            .ok_or_else(|| RangeError::Overflow(format!("{} - {} {}(s)", self, amount, unit)))?;
        self.add(negated, unit)
    }

    fn shift_millis(&self, millis: Option<i64>) -> Option<Self> {
        let delta = Duration::try_milliseconds(millis?)?;
        Some(Self {
            utc: self.utc.checked_add_signed(delta)?,
            zone: self.zone,
        })
    }

    /// Truncate to the first millisecond of the enclosing `unit` (weeks start on Sunday).
    pub fn start_of(&self, unit: Unit) -> Result<Self> {
        self.start_of_with(unit, WeekStartDay::default())
    }

    /// Truncate to the last millisecond of the enclosing `unit` (weeks start on Sunday).
    pub fn end_of(&self, unit: Unit) -> Result<Self> {
        self.end_of_with(unit, WeekStartDay::default())
    }

    /// [`Instant::start_of`] with an explicit week start.
    pub fn start_of_with(&self, unit: Unit, week_start: WeekStartDay) -> Result<Self> {
        let local = self.local();
        let millis_into_second = (local.nanosecond() % 1_000_000_000 / 1_000_000) as i64;
        let date = local.date();
        let start_date = match unit {
            Unit::Millisecond => return Ok(*self),
            Unit::Second => return self.truncate_by(millis_into_second),
            Unit::Minute => {
                return self.truncate_by(local.second() as i64 * 1_000 + millis_into_second)
            }
            Unit::Hour => {
                return self.truncate_by(
                    local.minute() as i64 * 60_000
                        + local.second() as i64 * 1_000
                        + millis_into_second,
                )
            }
            Unit::Day => Some(date),
            Unit::Week => date.checked_sub_signed(Duration::days(
                week_start.days_since_start(date.weekday()),
            )),
            Unit::Month => date.with_day(1),
            Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        }
        .ok_or_else(|| RangeError::Overflow(format!("start of {} for {}", unit, self)))?;
        Self::from_local(midnight(start_date), self.zone)
    }

    /// [`Instant::end_of`] with an explicit week start.
    pub fn end_of_with(&self, unit: Unit, week_start: WeekStartDay) -> Result<Self> {
        self.start_of_with(unit, week_start)?
            .add(1, unit)?
            .subtract(1, Unit::Millisecond)
    }

    fn truncate_by(&self, elapsed_millis: i64) -> Result<Self> {
        self.shift_millis(Some(-elapsed_millis))
            .ok_or_else(|| RangeError::Overflow(format!("truncating {}", self)))
    }

    /// The difference `self - other` expressed in `unit`.
    ///
    /// Sub-day units divide the absolute difference. Days and weeks measure the
    /// wall-clock difference in `self`'s zone, so a 23-hour DST day still counts as
    /// one day. Months and years count whole calendar months plus the elapsed
    /// fraction of the month that follows. With `fractional == false` the result is
    /// truncated toward zero.
    pub fn diff(&self, other: &Instant, unit: Unit, fractional: bool) -> Result<f64> {
        let raw = if let Some(per_unit) = unit.absolute_millis() {
            (self.utc - other.utc).num_milliseconds() as f64 / per_unit as f64
        } else if let Some(per_unit) = unit.wall_clock_millis() {
            let other_local = other.with_zone(self.zone).local();
            (self.local() - other_local).num_milliseconds() as f64 / per_unit as f64
        } else {
            let months = month_diff(self, other)?;
            if unit == Unit::Year {
                months / 12.0
            } else {
                months
            }
        };
        Ok(if fractional { raw } else { raw.trunc() })
    }

    // ── Formatting ──────────────────────────────────────────────────────

    /// Render with a `strftime` pattern (e.g. `"%Y-%m-%d %H:%M %Z"`).
    pub fn format(&self, pattern: &str) -> Result<String> {
        let items = pattern_items(pattern)?;
        let mut out = String::new();
        let written = match self.zone {
            Zone::Named(tz) => write!(
                out,
                "{}",
                self.utc.with_timezone(&tz).format_with_items(items.iter())
            ),
            Zone::Fixed(offset) => write!(
                out,
                "{}",
                self.utc.with_timezone(&offset).format_with_items(items.iter())
            ),
        };
        written.map_err(|_| RangeError::InvalidFormat(format!("'{}'", pattern)))?;
        Ok(out)
    }

    /// RFC 3339 with the zone's offset, e.g. `2025-06-10T09:00:00-04:00`.
    pub fn to_rfc3339(&self) -> String {
        self.utc
            .with_timezone(&self.offset())
            .to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.utc.hash(state);
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Instant::from_utc(dt, Zone::utc())
    }
}

impl From<DateTime<Tz>> for Instant {
    fn from(dt: DateTime<Tz>) -> Self {
        Instant::from_utc(dt.with_timezone(&Utc), Zone::Named(dt.timezone()))
    }
}

impl From<DateTime<FixedOffset>> for Instant {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Instant::from_utc(dt.with_timezone(&Utc), Zone::Fixed(*dt.offset()))
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

fn shift_days(local: NaiveDateTime, days: Option<i64>) -> Option<NaiveDateTime> {
    local.checked_add_signed(Duration::try_days(days?)?)
}

fn shift_months(local: NaiveDateTime, months: Option<i64>) -> Option<NaiveDateTime> {
    let months = months?;
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        local.checked_add_months(magnitude)
    } else {
        local.checked_sub_months(magnitude)
    }
}

/// `a - b` in calendar months, measured in `a`'s zone.
fn month_diff(a: &Instant, b: &Instant) -> Result<f64> {
    let b = b.with_zone(a.zone);
    if a.utc < b.utc {
        return Ok(-month_diff(&b, a)?);
    }
    let (a_local, b_local) = (a.local(), b.local());
    let whole = (a_local.year() - b_local.year()) as i64 * 12
        + (a_local.month() as i64 - b_local.month() as i64);
    let anchor = b.add(whole, Unit::Month)?;
    let fraction = if a.utc < anchor.utc {
        let previous = b.add(whole - 1, Unit::Month)?;
        millis_between(&anchor, a) / millis_between(&previous, &anchor)
    } else {
        let next = b.add(whole + 1, Unit::Month)?;
        millis_between(&anchor, a) / millis_between(&anchor, &next)
    };
    Ok(whole as f64 + fraction)
}

fn millis_between(from: &Instant, to: &Instant) -> f64 {
    (to.utc - from.utc).num_milliseconds() as f64
}

/// Parse a `strftime` pattern, rejecting unknown specifiers.
fn pattern_items(pattern: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(RangeError::InvalidFormat(format!("'{}'", pattern)));
    }
    Ok(items)
}

/// Fail if `pattern` is not a usable `strftime` pattern.
pub fn check_pattern(pattern: &str) -> Result<()> {
    pattern_items(pattern).map(|_| ())
}

// ── DateInput ───────────────────────────────────────────────────────────────

/// Any accepted representation of a date/time argument.
///
/// Deserializes from a JSON number (integer epoch milliseconds) or string. Any
/// other JSON value (`null`, a float, a bool, an object) still deserializes, as
/// [`DateInput::Unsupported`], so one odd element never fails a whole array;
/// it is rejected when resolved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDateInput")]
pub enum DateInput {
    /// Milliseconds since the Unix epoch.
    Epoch(i64),
    /// RFC 3339, naive `YYYY-MM-DD[THH:MM[:SS[.fff]]]`, or a string of epoch millis.
    Text(String),
    /// A wall-clock time with no zone attached.
    Local(NaiveDateTime),
    /// An already-resolved instant.
    Instant(Instant),
    /// A JSON value of a kind that is not a date, kept as its JSON text.
    Unsupported(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDateInput {
    Epoch(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawDateInput> for DateInput {
    fn from(raw: RawDateInput) -> Self {
        match raw {
            RawDateInput::Epoch(millis) => DateInput::Epoch(millis),
            RawDateInput::Text(text) => DateInput::Text(text),
            RawDateInput::Other(value) => DateInput::Unsupported(value.to_string()),
        }
    }
}

impl fmt::Display for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateInput::Epoch(millis) => write!(f, "{}", millis),
            DateInput::Text(text) => f.write_str(text),
            DateInput::Local(naive) => write!(f, "{}", naive),
            DateInput::Instant(instant) => write!(f, "{}", instant),
            DateInput::Unsupported(json) => f.write_str(json),
        }
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::Text(s.to_string())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        DateInput::Text(s)
    }
}

impl From<&String> for DateInput {
    fn from(s: &String) -> Self {
        DateInput::Text(s.clone())
    }
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        DateInput::Epoch(millis)
    }
}

impl From<Instant> for DateInput {
    fn from(instant: Instant) -> Self {
        DateInput::Instant(instant)
    }
}

impl From<&Instant> for DateInput {
    fn from(instant: &Instant) -> Self {
        DateInput::Instant(*instant)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(naive: NaiveDateTime) -> Self {
        DateInput::Local(naive)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Local(midnight(date))
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(dt: DateTime<Utc>) -> Self {
        DateInput::Instant(dt.into())
    }
}

impl From<DateTime<Tz>> for DateInput {
    fn from(dt: DateTime<Tz>) -> Self {
        DateInput::Instant(dt.into())
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        DateInput::Instant(dt.into())
    }
}

/// Normalize any accepted date representation into an [`Instant`].
///
/// Absolute inputs (RFC 3339 text, epoch millis, resolved instants) keep their
/// point in time and are converted into `zone` when one is given. Naive inputs
/// are wall-clock readings in `zone`, or in UTC when `zone` is `None`.
pub fn resolve_instant(input: &DateInput, zone: Option<Zone>) -> Result<Instant> {
    match input {
        DateInput::Instant(instant) => Ok(instant.in_zone(zone)),
        DateInput::Epoch(millis) => from_epoch(*millis, zone),
        DateInput::Local(naive) => Instant::from_local(*naive, zone.unwrap_or_else(Zone::utc)),
        DateInput::Text(text) => parse_text(text.trim(), zone),
        DateInput::Unsupported(json) => Err(RangeError::InvalidDatetime(format!(
            "{} is not a date string or integer epoch",
            json
        ))),
    }
}

fn from_epoch(millis: i64, zone: Option<Zone>) -> Result<Instant> {
    DateTime::from_timestamp_millis(millis)
        .map(|utc| Instant::from_utc(utc, zone.unwrap_or_else(Zone::utc)))
        .ok_or_else(|| RangeError::InvalidDatetime(format!("epoch millis {} out of range", millis)))
}

fn parse_text(text: &str, zone: Option<Zone>) -> Result<Instant> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Instant::from(dt).in_zone(zone));
    }
    let local_zone = zone.unwrap_or_else(Zone::utc);
    for layout in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return Instant::from_local(naive, local_zone);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Instant::from_local(midnight(date), local_zone);
    }
    if let Ok(millis) = text.parse::<i64>() {
        return from_epoch(millis, zone);
    }
    Err(RangeError::InvalidDatetime(format!("'{}'", text)))
}
