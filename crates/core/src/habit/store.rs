//! Persistence seam for habits.
//!
//! The facade in [`super::service`] only talks to a [`HabitStore`]. The
//! PostgreSQL implementation lives in the db crate; tests use an in-memory one.
//! Every method is a single atomic operation.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;

use super::{Habit, NewHabit};

#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Persist a new habit and return it with its assigned id.
    async fn insert(&self, habit: &NewHabit) -> Result<Habit, CoreError>;

    /// Look up a habit by id regardless of owner.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Habit>, CoreError>;

    /// All habits owned by `owner_id`, oldest first.
    async fn find_by_owner(&self, owner_id: DbId) -> Result<Vec<Habit>, CoreError>;

    /// Overwrite the mutable state of an existing habit. Returns `None` if the
    /// row no longer exists.
    async fn update(&self, habit: &Habit) -> Result<Option<Habit>, CoreError>;

    /// Remove a habit. Returns `true` if a row was deleted.
    async fn delete(&self, habit: &Habit) -> Result<bool, CoreError>;
}
