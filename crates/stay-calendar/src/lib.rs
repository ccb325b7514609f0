//! # stay-calendar
//!
//! Booking-calendar availability engine for stay reservations.
//!
//! Given a listing's blocked/booked/preparation dates, its trip-length, weekday
//! and advance-notice rules, and the guest's clicks, the engine decides which
//! days are selectable, whether a proposed check-in/check-out range is bookable,
//! and what the current selection is. It is framework-agnostic: the selection
//! logic is a pure `(state, event) -> (state, change)` function, and the only
//! asynchronous piece, the availability refetch, is a token-guarded coordinator
//! around a caller-supplied fetcher.
//!
//! ## Modules
//!
//! - [`day`] — `CalendarDay` and night arithmetic
//! - [`dateset`] — raw calendar payload → `InvalidDateSet`
//! - [`settings`] — host trip-length, weekday, lead-time and check-in rules
//! - [`clock`] — listing-local "now"
//! - [`rules`] — one predicate per business rule
//! - [`range`] — complete-range validation
//! - [`selection`] — selection state machine
//! - [`calendar`] — `BookingCalendar` and the disabled-day compositor
//! - [`coordinator`] — race-safe availability refetching
//! - [`error`] — Error types

pub mod calendar;
pub mod clock;
pub mod coordinator;
pub mod dateset;
pub mod day;
pub mod error;
pub mod range;
pub mod rules;
pub mod selection;
pub mod settings;

pub use calendar::{
    disabled_days, is_above_max_days, is_below_min_days, is_bookable, is_disabled,
    BookingCalendar, ListingConfig,
};
pub use clock::Clock;
pub use coordinator::{
    AvailabilityCoordinator, AvailabilityFetcher, AvailabilityQuery, AvailabilitySnapshot,
    FetchResponse, Guests, PendingRequest, RequestToken, Resolution,
};
pub use dateset::{normalize, InvalidDateSet, RawCalendar};
pub use day::{nights, CalendarDay};
pub use error::{CalendarError, FetchError};
pub use range::{is_range_free_of_blocked_nights, is_valid_complete_range};
pub use rules::RuleContext;
pub use selection::{transition, RangeChange, SelectionEvent, SelectionState, Transition};
pub use settings::{CalendarSettings, CheckInTime, HouseRules};
