//! Range validation for a complete `(from, to)` candidate.

use crate::day::{nights, CalendarDay};
use crate::rules::RuleContext;

/// The length and weekday gate a complete range must pass before it is
/// committed: `to` is not a restricted check-out weekday and the number of
/// nights lies within `[minTripLength, maxTripLength]`.
pub fn is_valid_complete_range(ctx: &RuleContext<'_>, from: CalendarDay, to: CalendarDay) -> bool {
    if ctx.is_restricted_checkout(to) {
        return false;
    }
    let n = nights(from, to);
    if n < ctx.settings.min_nights() {
        return false;
    }
    ctx.settings.max_nights().is_none_or(|max| n <= max)
}

/// True when no day strictly between `from` and `to` is invalid.
///
/// The check-out day is exempt (it is never slept in); the check-in day is
/// guarded by the disabled-day rules before it can be picked.
pub fn is_range_free_of_blocked_nights(
    ctx: &RuleContext<'_>,
    from: CalendarDay,
    to: CalendarDay,
) -> bool {
    !ctx.invalid.any_between(from, to)
}

/// The first invalid day strictly inside `(from, to)`, if any.
pub fn first_obstruction(
    ctx: &RuleContext<'_>,
    from: CalendarDay,
    to: CalendarDay,
) -> Option<CalendarDay> {
    ctx.invalid.first_between(from, to)
}
