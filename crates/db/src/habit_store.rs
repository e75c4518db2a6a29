//! PostgreSQL-backed [`HabitStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use tally_core::error::CoreError;
use tally_core::habit::store::HabitStore;
use tally_core::habit::{Habit, NewHabit};
use tally_core::types::DbId;

use crate::repositories::HabitRepo;

/// Habit persistence over a shared connection pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgHabitStore {
    pool: PgPool,
}

impl PgHabitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(op: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |e| {
        tracing::error!(error = %e, op, "Habit store query failed");
        CoreError::Persistence(format!("{op}: {e}"))
    }
}

#[async_trait]
impl HabitStore for PgHabitStore {
    async fn insert(&self, habit: &NewHabit) -> Result<Habit, CoreError> {
        let row = HabitRepo::create(&self.pool, habit)
            .await
            .map_err(persistence("insert habit"))?;
        Habit::try_from(row)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Habit>, CoreError> {
        HabitRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence("find habit"))?
            .map(Habit::try_from)
            .transpose()
    }

    /// Rows that cannot be loaded (an unresolvable timezone, a malformed
    /// reset time) are logged and left out, so one bad record does not take
    /// the owner's listing, stats and reset sweep down with it.
    async fn find_by_owner(&self, owner_id: DbId) -> Result<Vec<Habit>, CoreError> {
        let rows = HabitRepo::list_by_user(&self.pool, owner_id)
            .await
            .map_err(persistence("list habits"))?;

        let mut habits = Vec::with_capacity(rows.len());
        for row in rows {
            let habit_id = row.id;
            match Habit::try_from(row) {
                Ok(habit) => habits.push(habit),
                Err(e) => {
                    tracing::warn!(habit_id, user_id = owner_id, error = %e, "Skipping unloadable habit");
                }
            }
        }
        Ok(habits)
    }

    async fn update(&self, habit: &Habit) -> Result<Option<Habit>, CoreError> {
        HabitRepo::update(&self.pool, habit)
            .await
            .map_err(persistence("update habit"))?
            .map(Habit::try_from)
            .transpose()
    }

    async fn delete(&self, habit: &Habit) -> Result<bool, CoreError> {
        HabitRepo::delete(&self.pool, habit.id)
            .await
            .map_err(persistence("delete habit"))
    }
}
