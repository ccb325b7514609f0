//! Selection state machine.
//!
//! The guest's selection is a pure value; [`transition`] maps `(state, event)` to
//! the next state plus the range change to publish, if any. A `None` change means
//! the event was ignored and the state is untouched.

use serde::{Deserialize, Serialize};

use crate::day::CalendarDay;
use crate::range::{first_obstruction, is_range_free_of_blocked_nights, is_valid_complete_range};
use crate::rules::RuleContext;

/// Current selection. In `Complete`, `from < to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum SelectionState {
    /// Nothing picked yet.
    #[default]
    Empty,
    /// Check-in picked, waiting for the check-out click.
    PartialFrom {
        /// Pending check-in day.
        from: CalendarDay,
    },
    /// A committed stay.
    Complete {
        /// Check-in day.
        from: CalendarDay,
        /// Check-out day, strictly after `from`.
        to: CalendarDay,
    },
}

impl SelectionState {
    /// Build the initial state from externally supplied values (e.g. a deep link).
    ///
    /// Both ends become `Complete` only if the range would have been accepted
    /// by a click sequence. Otherwise a usable check-in alone seeds
    /// `PartialFrom`, and anything else starts `Empty`.
    pub fn seed(
        ctx: &RuleContext<'_>,
        check_in: Option<CalendarDay>,
        check_out: Option<CalendarDay>,
    ) -> Self {
        let Some(from) = check_in else {
            return SelectionState::Empty;
        };
        if ctx.is_past_day(from) || ctx.is_restricted_check_in(from) {
            return SelectionState::Empty;
        }
        match check_out {
            Some(to)
                if from < to
                    && is_valid_complete_range(ctx, from, to)
                    && is_range_free_of_blocked_nights(ctx, from, to) =>
            {
                SelectionState::Complete { from, to }
            }
            _ => SelectionState::PartialFrom { from },
        }
    }

    pub fn from(&self) -> Option<CalendarDay> {
        match *self {
            SelectionState::Empty => None,
            SelectionState::PartialFrom { from } | SelectionState::Complete { from, .. } => {
                Some(from)
            }
        }
    }

    pub fn to(&self) -> Option<CalendarDay> {
        match *self {
            SelectionState::Complete { to, .. } => Some(to),
            _ => None,
        }
    }

    /// The `{from, to}` projection handed to the surrounding application.
    pub fn as_change(&self) -> RangeChange {
        RangeChange {
            check_in: self.from(),
            check_out: self.to(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SelectionState::Complete { .. })
    }
}

/// User input the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionEvent {
    /// The guest clicked `day` on the grid.
    Select { day: CalendarDay },
    /// The guest cleared the selection.
    Reset,
}

/// The `(checkIn, checkOut)` pair published on every meaningful change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeChange {
    /// `None` after a reset.
    pub check_in: Option<CalendarDay>,
    /// `None` until the range is complete.
    pub check_out: Option<CalendarDay>,
}

impl RangeChange {
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn started(day: CalendarDay) -> Self {
        Self {
            check_in: Some(day),
            check_out: None,
        }
    }

    pub fn completed(from: CalendarDay, to: CalendarDay) -> Self {
        Self {
            check_in: Some(from),
            check_out: Some(to),
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// State after the event; unchanged when the event was ignored.
    pub state: SelectionState,
    /// Change to publish, or `None` when the event was ignored.
    pub emitted: Option<RangeChange>,
}

impl Transition {
    fn ignored(state: SelectionState) -> Self {
        Self {
            state,
            emitted: None,
        }
    }

    fn start_at(day: CalendarDay) -> Self {
        Self {
            state: SelectionState::PartialFrom { from: day },
            emitted: Some(RangeChange::started(day)),
        }
    }
}

/// Apply `event` to `state`.
pub fn transition(
    ctx: &RuleContext<'_>,
    state: SelectionState,
    event: SelectionEvent,
) -> Transition {
    let next = match event {
        SelectionEvent::Reset => Transition {
            state: SelectionState::Empty,
            emitted: Some(RangeChange::cleared()),
        },
        SelectionEvent::Select { day } => select(ctx, state, day),
    };
    tracing::trace!(
        ?state,
        ?event,
        next = ?next.state,
        emitted = next.emitted.is_some(),
        "selection transition"
    );
    next
}

fn select(ctx: &RuleContext<'_>, state: SelectionState, clicked: CalendarDay) -> Transition {
    match state {
        SelectionState::Empty | SelectionState::Complete { .. } => {
            if ctx.is_restricted_check_in(clicked) {
                Transition::ignored(state)
            } else {
                Transition::start_at(clicked)
            }
        }
        SelectionState::PartialFrom { from } => select_end(ctx, state, from, clicked),
    }
}

fn select_end(
    ctx: &RuleContext<'_>,
    state: SelectionState,
    from: CalendarDay,
    clicked: CalendarDay,
) -> Transition {
    if clicked == from {
        return Transition::ignored(state);
    }

    let (lo, hi) = if clicked < from {
        (clicked, from)
    } else {
        (from, clicked)
    };

    if ctx.is_restricted_check_in(lo) {
        return Transition::ignored(state);
    }

    let free = is_range_free_of_blocked_nights(ctx, lo, hi);
    if free && is_valid_complete_range(ctx, lo, hi) {
        return Transition {
            state: SelectionState::Complete { from: lo, to: hi },
            emitted: Some(RangeChange::completed(lo, hi)),
        };
    }

    if free {
        return Transition::ignored(state);
    }

    // Jump the start past the obstruction instead of rejecting the click.
    match first_obstruction(ctx, lo, hi) {
        Some(obstruction) if !ctx.is_restricted_check_in(obstruction) => {
            tracing::debug!(
                %lo,
                %hi,
                %obstruction,
                "range crosses invalid day; restarting selection"
            );
            Transition::start_at(obstruction)
        }
        _ => Transition::ignored(state),
    }
}
