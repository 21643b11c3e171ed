//! Engine-wide options.
//!
//! Plain operations use [`EngineOptions::default`]; each looping operation also has
//! a `*_with_options` variant. Options can be loaded from JSON, where every field
//! is optional:
//!
//! ```
//! use range_engine::config::EngineOptions;
//! use range_engine::unit::WeekStartDay;
//!
//! let options = EngineOptions::from_json(r#"{"week_start": "monday"}"#).unwrap();
//! assert_eq!(options.week_start, WeekStartDay::Monday);
//! assert_eq!(options.max_items, EngineOptions::default().max_items);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RangeError, Result};
use crate::unit::WeekStartDay;

/// Default cap on occurrences, chunks or slots produced by one call.
pub const DEFAULT_MAX_ITEMS: usize = 100_000;

/// Default cap on days scanned by business-day searches (about ten years).
pub const DEFAULT_MAX_LOOKAHEAD_DAYS: u32 = 3_660;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Maximum number of items a single call may produce before failing with
    /// [`RangeError::LimitExceeded`].
    pub max_items: usize,
    /// Maximum number of days a business-day search may scan before failing with
    /// [`RangeError::NoBusinessDay`].
    pub max_lookahead_days: u32,
    /// First day of the week for `Unit::Week` truncation.
    pub week_start: WeekStartDay,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            max_lookahead_days: DEFAULT_MAX_LOOKAHEAD_DAYS,
            week_start: WeekStartDay::default(),
        }
    }
}

impl EngineOptions {
    /// Parse options from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: EngineOptions =
            serde_json::from_str(json).map_err(|e| RangeError::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Reject limits that would make every call fail.
    pub fn validate(&self) -> Result<()> {
        if self.max_items == 0 {
            return Err(RangeError::InvalidConfig(
                "max_items must be at least 1".to_string(),
            ));
        }
        if self.max_lookahead_days == 0 {
            return Err(RangeError::InvalidConfig(
                "max_lookahead_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
