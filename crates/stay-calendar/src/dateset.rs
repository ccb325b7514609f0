//! Normalise the raw calendar payload into the canonical set of invalid days.
//!
//! Blocked, booked, and preparation-time dates all arrive as ISO date strings.
//! They are merged into one ordered set so membership tests, "first obstruction
//! after a day", and "anything between two days" are all range queries on a
//! `BTreeSet`, independent of payload order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::day::CalendarDay;

/// Calendar payload as served by the listing API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCalendar {
    pub blocked_dates: Vec<String>,
    pub booked_dates: Vec<String>,
    pub preparation_time_dates: Vec<String>,
}

impl RawCalendar {
    pub fn normalize(&self) -> InvalidDateSet {
        normalize(
            &self.blocked_dates,
            &self.booked_dates,
            &self.preparation_time_dates,
        )
    }
}

/// Union of blocked, booked, and preparation-time days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidDateSet {
    days: BTreeSet<CalendarDay>,
}

impl InvalidDateSet {
    pub fn contains(&self, day: CalendarDay) -> bool {
        self.days.contains(&day)
    }

    /// The first invalid day strictly after `day`.
    pub fn first_after(&self, day: CalendarDay) -> Option<CalendarDay> {
        self.days.range(day.succ()..).next().copied()
    }

    /// The first invalid day strictly between `lo` and `hi` (both exclusive).
    pub fn first_between(&self, lo: CalendarDay, hi: CalendarDay) -> Option<CalendarDay> {
        if lo.succ() >= hi {
            return None;
        }
        self.days.range(lo.succ()..hi).next().copied()
    }

    pub fn any_between(&self, lo: CalendarDay, hi: CalendarDay) -> bool {
        self.first_between(lo, hi).is_some()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.days.iter().copied()
    }
}

impl FromIterator<CalendarDay> for InvalidDateSet {
    fn from_iter<I: IntoIterator<Item = CalendarDay>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Merge the three date lists into an [`InvalidDateSet`].
///
/// Entries that do not parse as ISO dates are dropped; the payload originates
/// server-side and a bad entry must not take the calendar down. The result is
/// identical for any ordering or duplication of the inputs.
pub fn normalize<S: AsRef<str>>(
    blocked_dates: &[S],
    booked_dates: &[S],
    preparation_time_dates: &[S],
) -> InvalidDateSet {
    let mut dropped = 0usize;
    let days = blocked_dates
        .iter()
        .chain(booked_dates)
        .chain(preparation_time_dates)
        .filter_map(|raw| match CalendarDay::parse(raw.as_ref()) {
            Ok(day) => Some(day),
            Err(_) => {
                dropped += 1;
                None
            }
        })
        .collect::<BTreeSet<_>>();

    if dropped > 0 {
        tracing::debug!(dropped, "dropped malformed calendar dates");
    }

    InvalidDateSet { days }
}
