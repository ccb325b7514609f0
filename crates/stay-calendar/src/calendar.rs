//! The engine instance driving one listing's calendar widget.
//!
//! `BookingCalendar` owns the listing inputs, the derived [`InvalidDateSet`], and
//! the current [`SelectionState`]. It exposes the per-day `is_disabled`
//! predicate the grid calls for every rendered cell, the hover helpers, and the
//! `select`/`reset` commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::coordinator::AvailabilitySnapshot;
use crate::dateset::{InvalidDateSet, RawCalendar};
use crate::day::CalendarDay;
use crate::error::{CalendarError, Result};
use crate::rules::RuleContext;
use crate::selection::{transition, RangeChange, SelectionEvent, SelectionState};
use crate::settings::{CalendarSettings, HouseRules};

/// Everything a listing supplies to the engine, as one serde document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingConfig {
    pub settings: CalendarSettings,
    pub house_rules: HouseRules,
    pub calendar: RawCalendar,
    /// IANA timezone of the listing; `None` means UTC.
    pub timezone: Option<String>,
}

impl ListingConfig {
    /// Parse a listing document.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidConfig` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CalendarError::InvalidConfig(e.to_string()))
    }

    pub fn timezone(&self) -> &str {
        self.timezone.as_deref().unwrap_or("UTC")
    }
}

type CommitHook = Box<dyn FnMut(Option<CalendarDay>, Option<CalendarDay>)>;

pub struct BookingCalendar {
    settings: CalendarSettings,
    house_rules: HouseRules,
    invalid: InvalidDateSet,
    clock: Clock,
    state: SelectionState,
    on_commit: Option<CommitHook>,
}

impl BookingCalendar {
    pub fn new(
        settings: CalendarSettings,
        house_rules: HouseRules,
        calendar: &RawCalendar,
        clock: Clock,
    ) -> Self {
        Self {
            settings,
            house_rules,
            invalid: calendar.normalize(),
            clock,
            state: SelectionState::Empty,
            on_commit: None,
        }
    }

    pub fn from_config(config: &ListingConfig, clock: Clock) -> Self {
        Self::new(
            config.settings.clone(),
            config.house_rules.clone(),
            &config.calendar,
            clock,
        )
    }

    /// Seed the selection from values the caller parsed out of a deep link.
    pub fn with_seed(
        mut self,
        check_in: Option<CalendarDay>,
        check_out: Option<CalendarDay>,
    ) -> Self {
        self.state = SelectionState::seed(&self.context(), check_in, check_out);
        self
    }

    /// Register the callback fired with `(checkIn, checkOut)` on every
    /// meaningful selection change.
    pub fn on_commit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Option<CalendarDay>, Option<CalendarDay>) + 'static,
    {
        self.on_commit = Some(Box::new(hook));
        self
    }

    pub fn context(&self) -> RuleContext<'_> {
        RuleContext::new(&self.settings, &self.house_rules, &self.invalid, self.clock)
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selection(&self) -> RangeChange {
        self.state.as_change()
    }

    pub fn invalid_dates(&self) -> &InvalidDateSet {
        &self.invalid
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub fn house_rules(&self) -> &HouseRules {
        &self.house_rules
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Rebuild the invalid set from a fresh payload. The selection is kept as is.
    pub fn apply_calendar(&mut self, calendar: &RawCalendar) {
        self.invalid = calendar.normalize();
    }

    /// Feed a resolved availability response back into the engine.
    pub fn apply_snapshot(&mut self, snapshot: &AvailabilitySnapshot) {
        if let Some(calendar) = &snapshot.calendar {
            self.apply_calendar(calendar);
        }
    }

    pub fn select(&mut self, day: CalendarDay) -> Option<RangeChange> {
        self.dispatch(SelectionEvent::Select { day })
    }

    pub fn reset(&mut self) -> Option<RangeChange> {
        self.dispatch(SelectionEvent::Reset)
    }

    fn dispatch(&mut self, event: SelectionEvent) -> Option<RangeChange> {
        let next = transition(&self.context(), self.state, event);
        self.state = next.state;
        if let (Some(change), Some(hook)) = (next.emitted, self.on_commit.as_mut()) {
            hook(change.check_in, change.check_out);
        }
        next.emitted
    }

    /// The predicate the calendar grid calls for every rendered day.
    pub fn is_disabled(&self, day: CalendarDay) -> bool {
        is_disabled(&self.context(), self.state, day)
    }

    /// Hover helper: `day` is after the pending check-in but short of the
    /// minimum stay. Always false unless a check-in is pending.
    pub fn is_below_min_days(&self, day: CalendarDay) -> bool {
        is_below_min_days(&self.context(), self.state, day)
    }

    /// Hover helper: `day` is beyond the maximum stay from the pending check-in.
    pub fn is_above_max_days(&self, day: CalendarDay) -> bool {
        is_above_max_days(&self.context(), self.state, day)
    }

    /// Disabled days of the inclusive span `[first, last]`, ascending.
    pub fn disabled_days(&self, first: CalendarDay, last: CalendarDay) -> Vec<CalendarDay> {
        disabled_days(&self.context(), self.state, first, last)
    }

    /// Whether a guest could commit exactly `from..to` on this calendar.
    pub fn is_bookable(&self, from: CalendarDay, to: CalendarDay) -> bool {
        is_bookable(&self.context(), from, to)
    }
}

impl fmt::Debug for BookingCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingCalendar")
            .field("settings", &self.settings)
            .field("house_rules", &self.house_rules)
            .field("invalid", &self.invalid.len())
            .field("clock", &self.clock)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Combine every predicate for the current selection phase.
///
/// Past days, days beyond the availability window, and days inside the advance
/// notice are disabled in every phase. The rest depends on what the next click
/// would mean:
///
/// - no pending check-in: the day would become a check-in, so invalid days and
///   restricted check-in weekdays are disabled;
/// - pending check-in, earlier day: it would become the new check-in (the range
///   is sorted), same rules as above;
/// - pending check-in, later day: it would become the check-out, so the
///   length bounds, restricted check-out weekdays, and the check-out refinement
///   of the blocked rule apply.
pub fn is_disabled(ctx: &RuleContext<'_>, state: SelectionState, day: CalendarDay) -> bool {
    if ctx.is_past_day(day) || ctx.is_beyond_horizon(day) || ctx.is_under_advance_notice(day) {
        return true;
    }

    match state {
        SelectionState::Empty => as_check_in_disabled(ctx, day),
        SelectionState::Complete { to, .. } => {
            // The committed check-out may sit on an invalid day; keep it visible.
            day != to && as_check_in_disabled(ctx, day)
        }
        SelectionState::PartialFrom { from } => {
            if day == from {
                false
            } else if day < from {
                as_check_in_disabled(ctx, day)
            } else {
                ctx.is_blocked_as_checkout(from, day)
                    || ctx.is_below_min_length(from, day)
                    || ctx.is_above_max_length(from, day)
                    || ctx.is_restricted_checkout(day)
            }
        }
    }
}

fn as_check_in_disabled(ctx: &RuleContext<'_>, day: CalendarDay) -> bool {
    ctx.is_blocked(day) || ctx.is_restricted_check_in(day)
}

/// Stateless form of [`BookingCalendar::is_below_min_days`].
pub fn is_below_min_days(ctx: &RuleContext<'_>, state: SelectionState, day: CalendarDay) -> bool {
    match state {
        SelectionState::PartialFrom { from } => ctx.is_below_min_length(from, day),
        _ => false,
    }
}

/// Stateless form of [`BookingCalendar::is_above_max_days`].
pub fn is_above_max_days(ctx: &RuleContext<'_>, state: SelectionState, day: CalendarDay) -> bool {
    match state {
        SelectionState::PartialFrom { from } => ctx.is_above_max_length(from, day),
        _ => false,
    }
}

/// True when clicking `from` and then `to` on an empty calendar commits exactly
/// `from..to`.
///
/// Both clicks must land on enabled days, so the check-in day itself is held to
/// the check-in rules (invalid, past, horizon, advance notice, weekday) and the
/// check-out to the check-out rules.
pub fn is_bookable(ctx: &RuleContext<'_>, from: CalendarDay, to: CalendarDay) -> bool {
    let pending = SelectionState::PartialFrom { from };
    if is_disabled(ctx, SelectionState::Empty, from) || is_disabled(ctx, pending, to) {
        return false;
    }
    transition(ctx, pending, SelectionEvent::Select { day: to }).state
        == SelectionState::Complete { from, to }
}

/// Disabled days of the inclusive span `[first, last]`, ascending.
pub fn disabled_days(
    ctx: &RuleContext<'_>,
    state: SelectionState,
    first: CalendarDay,
    last: CalendarDay,
) -> Vec<CalendarDay> {
    let mut out = Vec::new();
    let mut day = first;
    while day <= last {
        if is_disabled(ctx, state, day) {
            out.push(day);
        }
        let next = day.succ();
        if next == day {
            break;
        }
        day = next;
    }
    out
}
