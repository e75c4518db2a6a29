//! Habit row model.

use chrono::NaiveTime;
use sqlx::FromRow;
use tally_core::error::CoreError;
use tally_core::habit::{Habit, HabitTimezone};
use tally_core::types::{DbId, Timestamp};

/// A habit row from the `habits` table, before timezone resolution.
#[derive(Debug, Clone, FromRow)]
pub struct HabitRow {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub timezone: String,
    pub reset_time: NaiveTime,
    pub is_completed: bool,
    pub streak: i32,
    pub last_completed: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<HabitRow> for Habit {
    type Error = CoreError;

    /// Fails only if a stored timezone no longer resolves, which means the
    /// row was written outside the service.
    fn try_from(row: HabitRow) -> Result<Self, Self::Error> {
        let timezone: HabitTimezone = row.timezone.parse().map_err(|_| {
            CoreError::Internal(format!(
                "habit {} has unresolvable timezone '{}'",
                row.id, row.timezone
            ))
        })?;

        Ok(Habit {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            timezone,
            reset_time: row.reset_time,
            is_completed: row.is_completed,
            streak: row.streak,
            last_completed: row.last_completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
