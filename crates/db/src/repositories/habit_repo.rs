//! Repository for the `habits` table.
//!
//! Works in terms of [`HabitRow`]; conversion to the domain
//! [`Habit`](tally_core::habit::Habit) happens in [`crate::habit_store`].

use sqlx::PgPool;
use tally_core::habit::{Habit, NewHabit};
use tally_core::types::DbId;

use crate::models::habit::HabitRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, description, timezone, reset_time, is_completed, \
                       streak, last_completed, created_at, updated_at";

/// Provides CRUD operations for habits.
pub struct HabitRepo;

impl HabitRepo {
    /// Insert a new habit, returning the created row.
    ///
    /// `created_at` and `updated_at` both take `input.created_at`.
    pub async fn create(pool: &PgPool, input: &NewHabit) -> Result<HabitRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO habits (user_id, name, description, timezone, reset_time, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.timezone.to_string())
            .bind(input.reset_time)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a habit by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HabitRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habits WHERE id = $1");
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's habits, oldest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<HabitRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habits WHERE user_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Distinct ids of users that own at least one habit.
    pub async fn list_owner_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT DISTINCT user_id FROM habits ORDER BY user_id")
            .fetch_all(pool)
            .await
    }

    /// Overwrite every mutable column of a habit with the given state.
    ///
    /// Returns `None` if the row no longer exists.
    pub async fn update(pool: &PgPool, habit: &Habit) -> Result<Option<HabitRow>, sqlx::Error> {
        let query = format!(
            "UPDATE habits SET
                name = $2,
                description = $3,
                timezone = $4,
                reset_time = $5,
                is_completed = $6,
                streak = $7,
                last_completed = $8,
                updated_at = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(habit.id)
            .bind(&habit.name)
            .bind(&habit.description)
            .bind(habit.timezone.to_string())
            .bind(habit.reset_time)
            .bind(habit.is_completed)
            .bind(habit.streak)
            .bind(habit.last_completed)
            .bind(habit.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a habit. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
