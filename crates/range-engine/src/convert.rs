//! Reformat a batch of instants into a target timezone.
//!
//! The zone and the pattern are validated once; a bad zone or pattern fails the
//! whole call. Individual inputs that cannot be resolved are dropped and reported
//! in [`BatchConversion::rejected`] rather than aborting the batch.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::instant::{check_pattern, resolve_instant, DateInput, Zone};

/// An input that was dropped from a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedInput {
    /// Position of the input in the batch.
    pub index: usize,
    /// The input as given.
    pub input: String,
    /// Why it could not be converted.
    pub reason: String,
}

/// Result of [`convert_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchConversion {
    /// Formatted values for every accepted input, in input order.
    pub formatted: Vec<String>,
    /// Inputs that were dropped.
    pub rejected: Vec<RejectedInput>,
}

impl BatchConversion {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Convert every input into `target_zone` and render it with the `strftime`
/// `pattern`.
///
/// Offset-less inputs are read as UTC before conversion.
///
/// # Errors
/// Returns [`crate::RangeError::InvalidTimezone`] for an unknown zone and
/// [`crate::RangeError::InvalidFormat`] for a bad pattern. Per-input failures are
/// never errors.
pub fn convert_all<I, D>(inputs: I, target_zone: &str, pattern: &str) -> Result<BatchConversion>
where
    I: IntoIterator<Item = D>,
    D: Into<DateInput>,
{
    let zone = Zone::named(target_zone)?;
    check_pattern(pattern)?;

    let mut batch = BatchConversion::default();
    for (index, input) in inputs.into_iter().enumerate() {
        let input = input.into();
        let converted = resolve_instant(&input, None)
            .and_then(|instant| instant.with_zone(zone).format(pattern));
        match converted {
            Ok(text) => batch.formatted.push(text),
            Err(e) => {
                warn!(index, input = %input, error = %e, "dropping unconvertible instant");
                batch.rejected.push(RejectedInput {
                    index,
                    input: input.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        zone = target_zone,
        converted = batch.formatted.len(),
        rejected = batch.rejected.len(),
        "converted batch"
    );
    Ok(batch)
}
