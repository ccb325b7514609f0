//! Calendar days -- the sole unit of comparison in the engine.
//!
//! Every rule compares by day, never by time-of-day. A `CalendarDay` wraps a
//! `NaiveDate` (a date already truncated to listing-local midnight) and exposes an
//! integer ordinal for set membership and ordering.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// A date at local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Build a day from year/month/day. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse an ISO `YYYY-MM-DD` string.
    ///
    /// Payloads sometimes carry full timestamps (`2025-08-11T00:00:00Z` or
    /// `2025-08-11 00:00:00`); a suffix is only dropped when it starts with `T`
    /// or a space.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let date_part = match trimmed.split_at_checked(10) {
            Some((date, rest)) if rest.starts_with(['T', ' ']) => date,
            _ => trimmed,
        };
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| CalendarError::InvalidDate(format!("'{}': {}", s, e)))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Days since 0001-01-01; the integer key used for ordering and membership.
    pub fn ordinal(self) -> i64 {
        i64::from(self.0.num_days_from_ce())
    }

    /// ISO weekday, Monday = 1 .. Sunday = 7.
    pub fn iso_weekday(self) -> u8 {
        self.0.weekday().number_from_monday() as u8
    }

    /// The day `n` days later (or earlier for negative `n`), saturating at the
    /// representable range.
    pub fn add_days(self, n: i64) -> Self {
        Duration::try_days(n)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
            .unwrap_or(self)
    }

    pub fn succ(self) -> Self {
        self.add_days(1)
    }

    pub fn start(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// The last representable second of the day.
    pub fn end(self) -> NaiveDateTime {
        self.after_start(Duration::seconds(86_399))
    }

    /// `start()` plus a whole number of hours.
    pub fn at_hour(self, hour: u8) -> NaiveDateTime {
        self.after_start(Duration::hours(i64::from(hour)))
    }

    /// Saturates at `NaiveDateTime::MAX`.
    fn after_start(self, offset: Duration) -> NaiveDateTime {
        self.start()
            .checked_add_signed(offset)
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Number of nights between two days: `to - from` in whole days.
///
/// Negative when `to` is before `from`.
pub fn nights(from: CalendarDay, to: CalendarDay) -> i64 {
    to.ordinal() - from.ordinal()
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for CalendarDay {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CalendarDay> for String {
    fn from(day: CalendarDay) -> Self {
        day.to_string()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
