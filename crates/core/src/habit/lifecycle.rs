//! Habit lifecycle engine: reset boundaries and completion/streak transitions.
//!
//! Everything here is pure. Functions take a habit and a reference instant and
//! either return a value or mutate the habit in place; persistence is the
//! caller's job.
//!
//! Two notions of "day" coexist:
//!
//! - The reset sweep ([`apply_reset`]) works in *periods* delimited by the
//!   habit's reset time ([`last_reset_boundary`]).
//! - The streak guard in [`apply_completion_toggle`] compares *calendar dates*
//!   in the habit's timezone and ignores the reset time.
//!
//! With a non-midnight reset time the two can disagree (see the
//! `streak_guard_uses_calendar_date_not_reset_period` test). Unifying them is a
//! behaviour change and must be made deliberately.

use crate::types::Timestamp;

use super::{truncate_to_minute, Habit};

/// What a completion toggle did to a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Incomplete -> complete. `streak_incremented` is false when the habit
    /// was already completed earlier on the same local calendar date.
    Completed { streak_incremented: bool },
    /// Completion requested on an already-completed habit; nothing changed.
    AlreadyCompleted,
    /// Completion cleared and streak zeroed.
    Uncompleted,
}

/// The most recent reset boundary at or before `now`.
///
/// Combines today's date in the habit's timezone with its reset time (seconds
/// zeroed). If that instant is still in the future, the boundary is the same
/// local time on the previous calendar day.
pub fn last_reset_boundary(habit: &Habit, now: Timestamp) -> Timestamp {
    let tz = habit.timezone;
    let reset = truncate_to_minute(habit.reset_time);
    let today = tz.local_date(now);

    let boundary = tz.resolve_local(today.and_time(reset));
    if boundary <= now {
        return boundary;
    }

    match today.pred_opt() {
        Some(yesterday) => tz.resolve_local(yesterday.and_time(reset)),
        None => boundary,
    }
}

/// Clear the completion flag if the habit has not been completed since its
/// most recent reset boundary. Returns `true` if the flag changed.
///
/// The streak is never touched here. Idempotent for non-decreasing `now`.
pub fn apply_reset(habit: &mut Habit, now: Timestamp) -> bool {
    let boundary = last_reset_boundary(habit, now);
    let stale = habit.last_completed.map_or(true, |last| last < boundary);

    if stale && habit.is_completed {
        habit.is_completed = false;
        habit.updated_at = now;
        true
    } else {
        false
    }
}

/// Apply a user-driven completion change.
///
/// - Completing an incomplete habit increments the streak when there is no
///   previous completion or the previous one fell on an earlier local calendar
///   date, then records `now` as `last_completed`.
/// - Completing an already-completed habit changes nothing.
/// - Un-completing zeroes the streak unconditionally.
///
/// `updated_at` is set to `now` in every case.
pub fn apply_completion_toggle(
    habit: &mut Habit,
    mark_completed: bool,
    now: Timestamp,
) -> Transition {
    habit.updated_at = now;

    if !mark_completed {
        habit.streak = 0;
        habit.is_completed = false;
        return Transition::Uncompleted;
    }

    if habit.is_completed {
        return Transition::AlreadyCompleted;
    }

    let today = habit.timezone.local_date(now);
    let streak_incremented = habit
        .last_completed
        .map_or(true, |last| habit.timezone.local_date(last) < today);

    if streak_incremented {
        habit.streak = habit.streak.saturating_add(1);
    }
    habit.last_completed = Some(now);
    habit.is_completed = true;

    Transition::Completed { streak_incremented }
}
