//! WASM bindings for range-engine.
//!
//! Exposes recurrence generation, range intersection/splitting/aggregation,
//! business-day resolution, slot generation and batch zone conversion to
//! JavaScript via `wasm-bindgen`. Complex values cross the boundary as JSON
//! strings; instants are RFC 3339 strings or epoch milliseconds.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p range-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/range-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/range_engine_wasm.wasm
//! ```

use range_engine::{DateInput, Range, RangeInput, SlotConstraints, Unit};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotDto {
    start: String,
    end: String,
    duration_minutes: i64,
}

impl From<&Range> for SlotDto {
    fn from(r: &Range) -> Self {
        Self {
            start: r.start.to_rfc3339(),
            end: r.end.to_rfc3339(),
            duration_minutes: r.duration_millis() / 60_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_unit(unit: &str) -> Result<Unit, JsValue> {
    unit.parse::<Unit>().map_err(js_error)
}

/// Parse a single `{start, end}` object and resolve it to a validated range.
fn parse_range_json(json: &str) -> Result<Range, JsValue> {
    let input: RangeInput = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid range JSON: {}", e)))?;
    input.resolve(None).map_err(js_error)
}

/// Parse a JSON array of `{start, end}` objects into validated ranges.
fn parse_ranges_json(json: &str) -> Result<Vec<Range>, JsValue> {
    let inputs: Vec<RangeInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid ranges JSON: {}", e)))?;
    inputs
        .iter()
        .map(|input| input.resolve(None).map_err(js_error))
        .collect()
}

/// Parse a JSON array of instants (strings or epoch millis). Elements of any
/// other JSON kind come back as `DateInput::Unsupported` and are rejected later.
fn parse_instants_json(json: &str) -> Result<Vec<DateInput>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid instants JSON: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// List every instant from `start` through `end` at `interval` units.
///
/// Returns a JSON array of RFC 3339 strings.
///
/// # Arguments
/// - `start`, `end` -- ISO 8601 datetimes; offset-less values are read in `timezone`
/// - `unit` -- e.g. "day", "week", "month"
/// - `interval` -- step size, at least 1
/// - `timezone` -- Optional IANA timezone for calendar arithmetic
#[wasm_bindgen(js_name = "generateOccurrences")]
pub fn generate_occurrences(
    start: &str,
    end: &str,
    unit: &str,
    interval: u32,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let unit = parse_unit(unit)?;
    let occurrences = range_engine::generate(start, end, unit, interval, timezone.as_deref())
        .map_err(js_error)?;
    to_json(&occurrences)
}

/// Intersect two `{start, end}` JSON objects.
///
/// Returns the common `{start, end}` object, or `null` when the ranges are disjoint.
#[wasm_bindgen(js_name = "intersectRanges")]
pub fn intersect_ranges(a_json: &str, b_json: &str) -> Result<String, JsValue> {
    let a = parse_range_json(a_json)?;
    let b = parse_range_json(b_json)?;
    let common = range_engine::intersect(&a, &b).map_err(js_error)?;
    to_json(&common)
}

/// Split `[start, end]` into chunks of `chunk_size` calendar units.
///
/// Returns a JSON array of `{start, end}` objects covering the range.
#[wasm_bindgen(js_name = "splitRange")]
pub fn split_range(
    start: &str,
    end: &str,
    unit: &str,
    chunk_size: u32,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let unit = parse_unit(unit)?;
    let zone = range_engine::Zone::optional(timezone.as_deref()).map_err(js_error)?;
    let range = RangeInput::new(start, end)
        .resolve(zone)
        .map_err(js_error)?;
    let chunks = range_engine::split(&range, unit, chunk_size).map_err(js_error)?;
    to_json(&chunks)
}

/// Sum the durations of a JSON array of `{start, end}` objects, in `unit`.
#[wasm_bindgen(js_name = "aggregateRanges")]
pub fn aggregate_ranges(ranges_json: &str, unit: &str) -> Result<f64, JsValue> {
    let unit = parse_unit(unit)?;
    let ranges = parse_ranges_json(ranges_json)?;
    range_engine::aggregate(&ranges, unit).map_err(js_error)
}

/// The first day strictly after `date` that is neither Saturday, Sunday nor a
/// holiday. `holidays_json` is a JSON array of dates.
///
/// Returns an RFC 3339 string.
#[wasm_bindgen(js_name = "nextBusinessDay")]
pub fn next_business_day(date: &str, holidays_json: &str) -> Result<String, JsValue> {
    let holidays = parse_instants_json(holidays_json)?;
    let next = range_engine::next_business_day(date, holidays).map_err(js_error)?;
    Ok(next.to_rfc3339())
}

/// Generate `slot_minutes`-long slots between `start` and `end`.
///
/// `constraints_json` is an object such as
/// `{"excludedWeekdays": [0, 6], "dailyWindow": {"start": "09:00", "end": "17:00"}}`;
/// every field is optional. Returns a JSON array of
/// `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(
    start: &str,
    end: &str,
    slot_minutes: u32,
    constraints_json: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let constraints: SlotConstraints = serde_json::from_str(constraints_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid constraints JSON: {}", e)))?;
    let slots = range_engine::generate_slots(
        start,
        end,
        slot_minutes,
        &constraints,
        timezone.as_deref(),
    )
    .map_err(js_error)?;

    let dtos: Vec<SlotDto> = slots.iter().map(SlotDto::from).collect();
    to_json(&dtos)
}

/// Reformat a JSON array of instants in `target_zone` with a strftime `pattern`.
///
/// Returns `{formatted: [...], rejected: [{index, input, reason}]}`. Inputs that
/// cannot be parsed land in `rejected`; a bad zone or pattern is an error.
#[wasm_bindgen(js_name = "convertAll")]
pub fn convert_all(
    inputs_json: &str,
    target_zone: &str,
    pattern: &str,
) -> Result<String, JsValue> {
    let inputs = parse_instants_json(inputs_json)?;
    let batch = range_engine::convert_all(inputs, target_zone, pattern).map_err(js_error)?;
    to_json(&batch)
}
