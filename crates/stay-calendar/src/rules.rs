//! Rule predicates.
//!
//! Each predicate answers one question about a single calendar day: "would this
//! rule disable the day if the guest picked it next?" They are independent and
//! side-effect free; the range validator and the disabled-day compositor decide
//! which ones apply in which selection phase.

use chrono::NaiveDateTime;

use crate::clock::Clock;
use crate::dateset::InvalidDateSet;
use crate::day::{nights, CalendarDay};
use crate::settings::{CalendarSettings, CheckInTime, HouseRules};

/// Everything the predicates read, borrowed for the duration of one decision.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub settings: &'a CalendarSettings,
    pub house_rules: &'a HouseRules,
    pub invalid: &'a InvalidDateSet,
    pub clock: Clock,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        settings: &'a CalendarSettings,
        house_rules: &'a HouseRules,
        invalid: &'a InvalidDateSet,
        clock: Clock,
    ) -> Self {
        Self {
            settings,
            house_rules,
            invalid,
            clock,
        }
    }

    pub fn today(&self) -> CalendarDay {
        self.clock.today()
    }

    /// Last bookable day: `today + availabilityWindowInDays`.
    pub fn horizon(&self) -> CalendarDay {
        self.today().add_days(self.settings.window_days())
    }

    pub fn is_past_day(&self, day: CalendarDay) -> bool {
        day < self.today()
    }

    pub fn is_beyond_horizon(&self, day: CalendarDay) -> bool {
        day > self.horizon()
    }

    pub fn is_blocked(&self, day: CalendarDay) -> bool {
        self.invalid.contains(day)
    }

    /// Blocked status of a check-out candidate while a stay starting at `from`
    /// is being chosen.
    ///
    /// The check-out day is an exclusive boundary: nobody sleeps there, so an
    /// invalid day stays usable as check-out as long as no night of the stay is
    /// invalid and the stay meets the minimum length. Valid days are never
    /// blocked here, even past an obstruction; clicking them makes the selection
    /// jump forward instead.
    pub fn is_blocked_as_checkout(&self, from: CalendarDay, day: CalendarDay) -> bool {
        if day <= from {
            return self.is_blocked(day);
        }
        if !self.is_blocked(day) {
            return false;
        }
        self.invalid.any_between(from, day) || nights(from, day) < self.settings.min_nights()
    }

    /// True when `day` is after `from` but too close to make the minimum stay.
    pub fn is_below_min_length(&self, from: CalendarDay, day: CalendarDay) -> bool {
        day > from && nights(from, day) < self.settings.min_nights()
    }

    /// True when `day` is on/after `from` and too far to respect the maximum stay.
    pub fn is_above_max_length(&self, from: CalendarDay, day: CalendarDay) -> bool {
        if day < from {
            return false;
        }
        self.settings
            .max_nights()
            .is_some_and(|max| nights(from, day) > max)
    }

    /// The check-in moment on `day` that the advance-notice cutoff measures
    /// against.
    ///
    /// A fully flexible window uses the end of the day; otherwise the fixed
    /// start hour wins, falling back to the fixed end hour when only the start
    /// is flexible.
    pub fn check_in_moment(&self, day: CalendarDay) -> NaiveDateTime {
        match (
            self.house_rules.check_in_start_time,
            self.house_rules.check_in_end_time,
        ) {
            (CheckInTime::FixedHour(start), _) => day.at_hour(start),
            (CheckInTime::Flexible, CheckInTime::FixedHour(end)) => day.at_hour(end),
            (CheckInTime::Flexible, CheckInTime::Flexible) => day.end(),
        }
    }

    /// True when checking in on `day` would give the host less notice than
    /// `advanceNoticeHours`. Always false when no notice is configured or the
    /// host accepts requests inside the notice period.
    pub fn is_under_advance_notice(&self, day: CalendarDay) -> bool {
        let Some(notice) = self.settings.advance_notice() else {
            return false;
        };
        // A cutoff past the last representable instant covers every day.
        match self.clock.now().checked_add_signed(notice) {
            Some(cutoff) => self.check_in_moment(day) < cutoff,
            None => true,
        }
    }

    pub fn is_restricted_check_in(&self, day: CalendarDay) -> bool {
        self.settings.is_check_in_restricted(day.iso_weekday())
    }

    pub fn is_restricted_checkout(&self, day: CalendarDay) -> bool {
        self.settings.is_checkout_restricted(day.iso_weekday())
    }
}
