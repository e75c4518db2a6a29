//! Recurring habits with daily reset and streak tracking.
//!
//! - [`lifecycle`] -- pure reset-boundary and completion/streak transitions.
//! - [`stats`] -- per-user summary statistics.
//! - [`store`] -- the persistence seam ([`store::HabitStore`]).
//! - [`service`] -- the facade orchestrating store, clock and lifecycle.
//! - [`timezone`] -- the per-habit timezone type.

pub mod lifecycle;
pub mod service;
pub mod stats;
pub mod store;
pub mod timezone;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

pub use timezone::HabitTimezone;

/// Timezone applied when a habit is created without one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Daily reset time applied when a habit is created without one.
pub const DEFAULT_RESET_TIME: &str = "06:00";

/// Wire format of a reset time.
pub const RESET_TIME_FORMAT: &str = "%H:%M";

/// A recurring task a user tracks, as seen by the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Habit {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub timezone: HabitTimezone,
    /// Local time of day (in `timezone`) at which a new period begins.
    #[serde(with = "reset_time_format")]
    pub reset_time: NaiveTime,
    /// Completed since the most recent reset boundary.
    pub is_completed: bool,
    /// Consecutive periods completed. Never negative.
    pub streak: i32,
    /// Instant of the most recent incomplete -> complete transition.
    pub last_completed: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A validated habit ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub timezone: HabitTimezone,
    pub reset_time: NaiveTime,
    pub created_at: Timestamp,
}

/// DTO for creating a habit. Omitted timezone and reset time fall back to
/// [`DEFAULT_TIMEZONE`] and [`DEFAULT_RESET_TIME`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHabit {
    pub name: String,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub reset_time: Option<String>,
}

/// DTO for updating a habit. Every field is optional; only present fields
/// are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub reset_time: Option<String>,
    pub timezone: Option<String>,
    /// Routed through [`lifecycle::apply_completion_toggle`], never assigned directly.
    pub is_completed: Option<bool>,
}

/// Parse a `"HH:MM"` reset time into a minute-precision [`NaiveTime`].
pub fn parse_reset_time(raw: &str) -> Result<NaiveTime, CoreError> {
    let trimmed = raw.trim();
    if trimmed.len() > 5 {
        return Err(CoreError::Validation(format!(
            "reset_time '{raw}' must be in HH:MM format"
        )));
    }
    NaiveTime::parse_from_str(trimmed, RESET_TIME_FORMAT).map_err(|_| {
        CoreError::Validation(format!(
            "reset_time '{raw}' is not a valid 24-hour HH:MM time"
        ))
    })
}

/// Drop seconds and sub-second components.
pub(crate) fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

mod reset_time_format {
    use chrono::NaiveTime;
    use serde::Serializer;

    use super::RESET_TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(RESET_TIME_FORMAT))
    }
}
