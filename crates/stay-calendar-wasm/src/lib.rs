//! WASM bindings for stay-calendar.
//!
//! Exposes the disabled-day predicate, the selection state machine, and the
//! range validator to the browser calendar widget via `wasm-bindgen`. Every
//! export is stateless: the listing config and the current selection state
//! travel in as JSON strings and the new state travels back out, so the widget
//! can keep the selection in whatever store it already uses.
//!
//! `now` is always supplied by the caller as an RFC 3339 instant (e.g.
//! `new Date().toISOString()`); it is converted to the listing's timezone before
//! any day comparison.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p stay-calendar-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/stay-calendar-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/stay_calendar_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use stay_calendar::{
    is_above_max_days, is_below_min_days, is_bookable, is_disabled,
    is_range_free_of_blocked_nights, is_valid_complete_range, nights, transition, CalendarDay,
    Clock, ListingConfig, RangeChange, RawCalendar, RuleContext, SelectionEvent, SelectionState,
    Transition,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayFlagsDto {
    disabled: bool,
    below_min_days: bool,
    above_max_days: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeCheckDto {
    nights: i64,
    check_in_available: bool,
    valid_length: bool,
    free_of_blocked_nights: bool,
    bookable: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn parse_config(json: &str) -> Result<ListingConfig, JsValue> {
    ListingConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// An empty string means "no selection yet".
fn parse_state(json: &str) -> Result<SelectionState, JsValue> {
    if json.trim().is_empty() {
        return Ok(SelectionState::Empty);
    }
    serde_json::from_str(json).map_err(|e| js_err("Invalid selection state JSON", e))
}

fn parse_day(s: &str) -> Result<CalendarDay, JsValue> {
    CalendarDay::parse(s).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse an ISO 8601 instant. Strings without an offset are taken as UTC.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| js_err(&format!("Invalid datetime '{}'", s), e))
}

fn listing_clock(config: &ListingConfig, now: &str) -> Result<Clock, JsValue> {
    let instant = parse_instant(now)?;
    Clock::in_timezone(instant, config.timezone()).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_err("Serialization error", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Normalise a raw calendar payload (`{blockedDates, bookedDates,
/// preparationTimeDates}`) into a sorted, de-duplicated JSON array of ISO days.
/// Malformed dates are dropped.
#[wasm_bindgen(js_name = "normalizeDates")]
pub fn normalize_dates(calendar_json: &str) -> Result<String, JsValue> {
    let raw: RawCalendar =
        serde_json::from_str(calendar_json).map_err(|e| js_err("Invalid calendar JSON", e))?;
    let days: Vec<CalendarDay> = raw.normalize().iter().collect();
    to_json(&days)
}

/// Disabled days in the inclusive span `[first, last]` for the given selection
/// state, as a JSON array of ISO days.
#[wasm_bindgen(js_name = "disabledDays")]
pub fn disabled_days(
    config_json: &str,
    state_json: &str,
    first: &str,
    last: &str,
    now: &str,
) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let state = parse_state(state_json)?;
    let (first, last) = (parse_day(first)?, parse_day(last)?);
    let clock = listing_clock(&config, now)?;
    let invalid = config.calendar.normalize();
    let ctx = RuleContext::new(&config.settings, &config.house_rules, &invalid, clock);

    to_json(&stay_calendar::disabled_days(&ctx, state, first, last))
}

/// Disabled and hover flags for a single day.
#[wasm_bindgen(js_name = "dayFlags")]
pub fn day_flags(config_json: &str, state_json: &str, day: &str, now: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let state = parse_state(state_json)?;
    let day = parse_day(day)?;
    let clock = listing_clock(&config, now)?;
    let invalid = config.calendar.normalize();
    let ctx = RuleContext::new(&config.settings, &config.house_rules, &invalid, clock);

    to_json(&DayFlagsDto {
        disabled: is_disabled(&ctx, state, day),
        below_min_days: is_below_min_days(&ctx, state, day),
        above_max_days: is_above_max_days(&ctx, state, day),
    })
}

/// Apply a day click to the selection.
///
/// Returns `{"state": ..., "emitted": {"checkIn", "checkOut"} | null}`; a null
/// `emitted` means the click was ignored.
#[wasm_bindgen(js_name = "selectDay")]
pub fn select_day(config_json: &str, state_json: &str, day: &str, now: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let state = parse_state(state_json)?;
    let day = parse_day(day)?;
    let clock = listing_clock(&config, now)?;
    let invalid = config.calendar.normalize();
    let ctx = RuleContext::new(&config.settings, &config.house_rules, &invalid, clock);

    to_json(&transition(&ctx, state, SelectionEvent::Select { day }))
}

/// Clear the selection. Always returns the empty state with a cleared change.
#[wasm_bindgen(js_name = "resetSelection")]
pub fn reset_selection() -> Result<String, JsValue> {
    to_json(&Transition {
        state: SelectionState::Empty,
        emitted: Some(RangeChange::cleared()),
    })
}

/// Build the initial selection from deep-link values. Either end may be empty.
#[wasm_bindgen(js_name = "seedSelection")]
pub fn seed_selection(
    config_json: &str,
    check_in: Option<String>,
    check_out: Option<String>,
    now: &str,
) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let clock = listing_clock(&config, now)?;
    let invalid = config.calendar.normalize();
    let ctx = RuleContext::new(&config.settings, &config.house_rules, &invalid, clock);

    // Unparseable deep-link values are treated as absent.
    let check_in = check_in.as_deref().and_then(|s| CalendarDay::parse(s).ok());
    let check_out = check_out.as_deref().and_then(|s| CalendarDay::parse(s).ok());
    to_json(&SelectionState::seed(&ctx, check_in, check_out))
}

/// Check a complete `(from, to)` range against the listing rules. `bookable`
/// is true only when clicking `from` then `to` would commit exactly that range.
#[wasm_bindgen(js_name = "validateRange")]
pub fn validate_range(config_json: &str, from: &str, to: &str, now: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let (from, to) = (parse_day(from)?, parse_day(to)?);
    let clock = listing_clock(&config, now)?;
    let invalid = config.calendar.normalize();
    let ctx = RuleContext::new(&config.settings, &config.house_rules, &invalid, clock);

    to_json(&RangeCheckDto {
        nights: nights(from, to),
        check_in_available: !is_disabled(&ctx, SelectionState::Empty, from),
        valid_length: is_valid_complete_range(&ctx, from, to),
        free_of_blocked_nights: is_range_free_of_blocked_nights(&ctx, from, to),
        bookable: is_bookable(&ctx, from, to),
    })
}
