//! Error types for range-engine operations.
//!
//! Every variant is raised eagerly, before an operation starts looping.
//! "Nothing matched" outcomes (disjoint ranges, an empty recurrence) are not
//! errors: they come back as `Ok(None)` or `Ok(vec![])`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid format pattern: {0}")]
    InvalidFormat(String),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Invalid weekday {0}: expected 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekday(u8),

    /// A step parameter (`interval`, `chunk_size`, `slot_minutes`, ...) was zero.
    #[error("{0} must be a positive integer")]
    NonPositiveStep(&'static str),

    #[error("Invalid range: start {start} is after end {end}")]
    InvertedRange { start: String, end: String },

    #[error("Invalid daily window: {start} is after {end}")]
    InvertedWindow { start: String, end: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Calendar arithmetic out of range: {0}")]
    Overflow(String),

    #[error("Result exceeds the limit of {limit} items")]
    LimitExceeded { limit: usize },

    #[error("No business day found within {days} days of {date}")]
    NoBusinessDay { date: String, days: u32 },
}

pub type Result<T> = std::result::Result<T, RangeError>;
