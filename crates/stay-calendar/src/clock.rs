//! Listing-local "now".
//!
//! All day comparisons happen in the listing's wall-clock time. The engine never
//! reads the system clock on its own; callers hand it a `Clock` so decisions are
//! reproducible.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::day::CalendarDay;
use crate::error::{CalendarError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: NaiveDateTime,
}

impl Clock {
    /// A clock fixed at a listing-local wall-clock time.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Convert a UTC instant into the wall-clock time of an IANA timezone.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidTimezone` if `timezone` is not a valid IANA
    /// identifier.
    pub fn in_timezone(instant: DateTime<Utc>, timezone: &str) -> Result<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| CalendarError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self::at(instant.with_timezone(&tz).naive_local()))
    }

    /// The current system time in `timezone`.
    pub fn system(timezone: &str) -> Result<Self> {
        Self::in_timezone(Utc::now(), timezone)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> CalendarDay {
        CalendarDay::from(self.now.date())
    }
}
