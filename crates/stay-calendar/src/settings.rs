//! Host-configured booking rules.
//!
//! Both structs mirror the listing payload field-for-field (`camelCase`, every
//! field optional). Nothing here rejects bad values: the accessor methods clamp
//! them to safe defaults so a misconfigured listing still renders a calendar.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Window used when the payload carries a non-positive `availabilityWindowInDays`.
pub const DEFAULT_AVAILABILITY_WINDOW_DAYS: i64 = 365;

/// Upper clamp for `availabilityWindowInDays` (one hundred years).
pub const MAX_AVAILABILITY_WINDOW_DAYS: i64 = 36_500;

/// Upper clamp for `advanceNoticeHours` (one hundred years).
pub const MAX_ADVANCE_NOTICE_HOURS: i64 = MAX_AVAILABILITY_WINDOW_DAYS * 24;

/// Checkout hour used when the payload omits `checkoutTime`.
pub const DEFAULT_CHECKOUT_HOUR: u8 = 11;

/// Trip-length, weekday, and lead-time rules for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarSettings {
    /// Minimum nights; values below 1 act as 1.
    pub min_trip_length: i64,
    /// `0` (or anything below `min_trip_length`) means no upper bound.
    pub max_trip_length: i64,
    /// ISO weekdays (Monday = 1 .. Sunday = 7) on which a stay may not start.
    pub restricted_check_in_days: Vec<i64>,
    /// ISO weekdays on which a stay may not end.
    pub restricted_checkout_days: Vec<i64>,
    /// Hours of lead time required before check-in; `0` disables the cutoff.
    pub advance_notice_hours: i64,
    /// When set, the advance-notice cutoff is not enforced.
    pub allow_request_under_advance_notice_hours: bool,
    /// Days after today that remain bookable; non-positive means 365.
    pub availability_window_in_days: i64,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            min_trip_length: 1,
            max_trip_length: 0,
            restricted_check_in_days: Vec::new(),
            restricted_checkout_days: Vec::new(),
            advance_notice_hours: 0,
            allow_request_under_advance_notice_hours: false,
            availability_window_in_days: DEFAULT_AVAILABILITY_WINDOW_DAYS,
        }
    }
}

impl CalendarSettings {
    /// Minimum nights, never below 1.
    pub fn min_nights(&self) -> i64 {
        self.min_trip_length.max(1)
    }

    /// Maximum nights, or `None` when unbounded.
    pub fn max_nights(&self) -> Option<i64> {
        (self.max_trip_length >= self.min_nights()).then_some(self.max_trip_length)
    }

    pub fn is_check_in_restricted(&self, iso_weekday: u8) -> bool {
        self.restricted_check_in_days
            .iter()
            .any(|&d| d == i64::from(iso_weekday))
    }

    pub fn is_checkout_restricted(&self, iso_weekday: u8) -> bool {
        self.restricted_checkout_days
            .iter()
            .any(|&d| d == i64::from(iso_weekday))
    }

    /// Lead time the guest must give, or `None` when the cutoff does not apply
    /// (no notice configured, or the host accepts requests inside the notice).
    /// Clamped to [`MAX_ADVANCE_NOTICE_HOURS`].
    pub fn advance_notice(&self) -> Option<Duration> {
        if self.allow_request_under_advance_notice_hours || self.advance_notice_hours <= 0 {
            return None;
        }
        Duration::try_hours(self.advance_notice_hours.min(MAX_ADVANCE_NOTICE_HOURS))
    }

    /// Booking window in days, clamped to `1..=MAX_AVAILABILITY_WINDOW_DAYS`.
    pub fn window_days(&self) -> i64 {
        if self.availability_window_in_days > 0 {
            self.availability_window_in_days.min(MAX_AVAILABILITY_WINDOW_DAYS)
        } else {
            DEFAULT_AVAILABILITY_WINDOW_DAYS
        }
    }
}

/// A check-in boundary: either a fixed hour of day or "any time".
///
/// The listing payload encodes `Flexible` as `-1`; that encoding is kept on the
/// wire only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum CheckInTime {
    #[default]
    Flexible,
    FixedHour(u8),
}

impl From<i64> for CheckInTime {
    fn from(raw: i64) -> Self {
        match u8::try_from(raw) {
            Ok(hour) if hour < 24 => CheckInTime::FixedHour(hour),
            _ => CheckInTime::Flexible,
        }
    }
}

impl From<CheckInTime> for i64 {
    fn from(time: CheckInTime) -> Self {
        match time {
            CheckInTime::Flexible => -1,
            CheckInTime::FixedHour(hour) => i64::from(hour),
        }
    }
}

/// Time-of-day house rules. Only the check-in window feeds the engine (through
/// the advance-notice cutoff); `checkout_time` is carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseRules {
    pub check_in_start_time: CheckInTime,
    pub check_in_end_time: CheckInTime,
    pub checkout_time: u8,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            check_in_start_time: CheckInTime::Flexible,
            check_in_end_time: CheckInTime::Flexible,
            checkout_time: DEFAULT_CHECKOUT_HOUR,
        }
    }
}
