//! Habit service facade.
//!
//! Orchestrates CRUD against a [`HabitStore`] and routes every completion
//! change and reset through the pure [`lifecycle`](super::lifecycle) engine.
//! Ownership is checked on every read and write; a habit owned by someone
//! else is reported exactly like a missing one.

use futures::future::join_all;
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::{validate_optional_text, validate_required_text, MAX_TEXT_LENGTH};

use super::lifecycle::{apply_completion_toggle, apply_reset};
use super::stats::{compute_stats, HabitStats};
use super::store::HabitStore;
use super::{
    parse_reset_time, CreateHabit, Habit, HabitPatch, HabitTimezone, NewHabit,
    DEFAULT_RESET_TIME, DEFAULT_TIMEZONE,
};

/// Outcome of a reset sweep over one user's habits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetSummary {
    /// Habits loaded and evaluated.
    pub examined: usize,
    /// Habits whose completion flag was cleared and persisted.
    pub reset: Vec<DbId>,
    /// Habits whose cleared flag could not be persisted.
    pub failed: Vec<DbId>,
}

pub struct HabitService<S, C = SystemClock> {
    store: S,
    clock: C,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Habit", id }
}

impl<S: HabitStore, C: Clock> HabitService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Create a habit for `owner_id` with a zero streak and no completion.
    pub async fn create(&self, owner_id: DbId, input: CreateHabit) -> Result<Habit, CoreError> {
        validate_required_text("name", &input.name, MAX_TEXT_LENGTH)?;
        validate_optional_text("description", input.description.as_deref(), MAX_TEXT_LENGTH)?;
        let timezone: HabitTimezone = input
            .timezone
            .as_deref()
            .unwrap_or(DEFAULT_TIMEZONE)
            .parse()?;
        let reset_time =
            parse_reset_time(input.reset_time.as_deref().unwrap_or(DEFAULT_RESET_TIME))?;

        let new_habit = NewHabit {
            user_id: owner_id,
            name: input.name,
            description: input.description,
            timezone,
            reset_time,
            created_at: self.clock.now(),
        };

        let habit = self.store.insert(&new_habit).await?;
        tracing::info!(habit_id = habit.id, user_id = owner_id, "Habit created");
        Ok(habit)
    }

    /// Fetch a habit owned by `owner_id`.
    pub async fn get(&self, id: DbId, owner_id: DbId) -> Result<Habit, CoreError> {
        match self.store.find_by_id(id).await? {
            Some(habit) if habit.user_id == owner_id => Ok(habit),
            _ => Err(not_found(id)),
        }
    }

    /// All habits owned by `owner_id`.
    pub async fn list(&self, owner_id: DbId) -> Result<Vec<Habit>, CoreError> {
        self.store.find_by_owner(owner_id).await
    }

    /// Apply a patch to a habit owned by `owner_id`.
    ///
    /// Plain fields are validated and assigned first; a completion change is
    /// then routed through [`apply_completion_toggle`] so it sees the patched
    /// timezone.
    pub async fn update(
        &self,
        id: DbId,
        owner_id: DbId,
        patch: HabitPatch,
    ) -> Result<Habit, CoreError> {
        let mut habit = self.get(id, owner_id).await?;
        let now = self.clock.now();

        apply_patch(&mut habit, &patch)?;
        if let Some(mark_completed) = patch.is_completed {
            let transition = apply_completion_toggle(&mut habit, mark_completed, now);
            tracing::debug!(habit_id = id, ?transition, streak = habit.streak, "Completion toggled");
        }
        habit.updated_at = now;

        self.store.update(&habit).await?.ok_or_else(|| not_found(id))
    }

    /// Delete a habit owned by `owner_id`.
    pub async fn delete(&self, id: DbId, owner_id: DbId) -> Result<(), CoreError> {
        let habit = self.get(id, owner_id).await?;
        if self.store.delete(&habit).await? {
            tracing::info!(habit_id = id, user_id = owner_id, "Habit deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Clear the completion flag of every habit of `owner_id` that has not
    /// been completed since its latest reset boundary.
    ///
    /// Only changed habits are written, concurrently and independently. A
    /// failed write is logged and listed in [`ResetSummary::failed`]; it does
    /// not stop the others. Only a failure to load the habits fails the call.
    pub async fn reset_all(&self, owner_id: DbId) -> Result<ResetSummary, CoreError> {
        let habits = self.store.find_by_owner(owner_id).await?;
        let now = self.clock.now();

        let mut summary = ResetSummary {
            examined: habits.len(),
            ..ResetSummary::default()
        };

        let changed: Vec<Habit> = habits
            .into_iter()
            .filter_map(|mut habit| apply_reset(&mut habit, now).then_some(habit))
            .collect();

        let writes = changed
            .iter()
            .map(|habit| async move { (habit.id, self.store.update(habit).await) });

        for (id, result) in join_all(writes).await {
            match result {
                Ok(Some(_)) => summary.reset.push(id),
                Ok(None) => {
                    tracing::debug!(habit_id = id, "Habit deleted before reset was persisted");
                }
                Err(e) => {
                    tracing::warn!(
                        habit_id = id,
                        user_id = owner_id,
                        error = %e,
                        "Failed to persist habit reset"
                    );
                    summary.failed.push(id);
                }
            }
        }

        tracing::info!(
            user_id = owner_id,
            examined = summary.examined,
            reset = summary.reset.len(),
            failed = summary.failed.len(),
            "Habit reset sweep finished"
        );
        Ok(summary)
    }

    /// Summary statistics over the current state of `owner_id`'s habits.
    pub async fn stats(&self, owner_id: DbId) -> Result<HabitStats, CoreError> {
        let habits = self.store.find_by_owner(owner_id).await?;
        Ok(compute_stats(&habits))
    }
}

/// Validate every present field, then assign them. Leaves `habit` untouched
/// on validation failure.
fn apply_patch(habit: &mut Habit, patch: &HabitPatch) -> Result<(), CoreError> {
    if let Some(name) = &patch.name {
        validate_required_text("name", name, MAX_TEXT_LENGTH)?;
    }
    validate_optional_text("description", patch.description.as_deref(), MAX_TEXT_LENGTH)?;
    let reset_time = patch.reset_time.as_deref().map(parse_reset_time).transpose()?;
    let timezone = patch
        .timezone
        .as_deref()
        .map(str::parse::<HabitTimezone>)
        .transpose()?;

    if let Some(name) = &patch.name {
        habit.name = name.clone();
    }
    if let Some(description) = &patch.description {
        habit.description = Some(description.clone());
    }
    if let Some(reset_time) = reset_time {
        habit.reset_time = reset_time;
    }
    if let Some(timezone) = timezone {
        habit.timezone = timezone;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveTime, TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;
    use crate::types::Timestamp;

    // -----------------------------------------------------------------------
    // In-memory store
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<BTreeMap<DbId, Habit>>,
        next_id: AtomicI64,
        failing_updates: Mutex<HashSet<DbId>>,
    }

    impl MemoryStore {
        fn fail_updates_for(&self, id: DbId) {
            self.failing_updates.lock().unwrap().insert(id);
        }

        fn row(&self, id: DbId) -> Option<Habit> {
            self.rows.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl HabitStore for MemoryStore {
        async fn insert(&self, new: &NewHabit) -> Result<Habit, CoreError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let habit = Habit {
                id,
                user_id: new.user_id,
                name: new.name.clone(),
                description: new.description.clone(),
                timezone: new.timezone,
                reset_time: new.reset_time,
                is_completed: false,
                streak: 0,
                last_completed: None,
                created_at: new.created_at,
                updated_at: new.created_at,
            };
            self.rows.lock().unwrap().insert(id, habit.clone());
            Ok(habit)
        }

        async fn find_by_id(&self, id: DbId) -> Result<Option<Habit>, CoreError> {
            Ok(self.row(id))
        }

        async fn find_by_owner(&self, owner_id: DbId) -> Result<Vec<Habit>, CoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|h| h.user_id == owner_id)
                .cloned()
                .collect())
        }

        async fn update(&self, habit: &Habit) -> Result<Option<Habit>, CoreError> {
            if self.failing_updates.lock().unwrap().contains(&habit.id) {
                return Err(CoreError::Persistence("connection reset".into()));
            }
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&habit.id) {
                Some(row) => {
                    *row = habit.clone();
                    Ok(Some(habit.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, habit: &Habit) -> Result<bool, CoreError> {
            Ok(self.rows.lock().unwrap().remove(&habit.id).is_some())
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    const OWNER: DbId = 10;
    const STRANGER: DbId = 20;

    fn at(day: u32, hour: u32, minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 5, day, hour, minute, 0).unwrap()
    }

    fn service(now: Timestamp) -> HabitService<MemoryStore, FixedClock> {
        HabitService::new(MemoryStore::default(), FixedClock::new(now))
    }

    fn create_input(name: &str) -> CreateHabit {
        CreateHabit {
            name: name.to_string(),
            description: None,
            timezone: None,
            reset_time: None,
        }
    }

    fn complete() -> HabitPatch {
        HabitPatch {
            is_completed: Some(true),
            ..HabitPatch::default()
        }
    }

    // -----------------------------------------------------------------------
    // create / get / list
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_applies_defaults() {
        let svc = service(at(1, 9, 0));
        let habit = svc.create(OWNER, create_input("Stretch")).await.unwrap();

        assert_eq!(habit.user_id, OWNER);
        assert_eq!(habit.timezone, HabitTimezone::UTC);
        assert_eq!(habit.reset_time, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(habit.streak, 0);
        assert!(!habit.is_completed);
        assert_eq!(habit.last_completed, None);
        assert_eq!(habit.created_at, at(1, 9, 0));
        assert_eq!(habit.updated_at, at(1, 9, 0));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let svc = service(at(1, 9, 0));

        let empty = create_input("  ");
        assert_matches!(svc.create(OWNER, empty).await, Err(CoreError::Validation(_)));

        let bad_time = CreateHabit {
            reset_time: Some("25:00".into()),
            ..create_input("Run")
        };
        assert_matches!(svc.create(OWNER, bad_time).await, Err(CoreError::Validation(_)));

        let bad_tz = CreateHabit {
            timezone: Some("Atlantis/Capital".into()),
            ..create_input("Run")
        };
        assert_matches!(svc.create(OWNER, bad_tz).await, Err(CoreError::Validation(_)));

        assert!(svc.list(OWNER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_habit_is_indistinguishable_from_missing() {
        let svc = service(at(1, 9, 0));
        let habit = svc.create(OWNER, create_input("Journal")).await.unwrap();

        let foreign = svc.get(habit.id, STRANGER).await.unwrap_err();
        let missing = svc.get(9_999, STRANGER).await.unwrap_err();
        assert_matches!(foreign, CoreError::NotFound { entity: "Habit", id } if id == habit.id);
        assert_matches!(missing, CoreError::NotFound { entity: "Habit", id: 9_999 });
    }

    #[tokio::test]
    async fn list_only_returns_own_habits() {
        let svc = service(at(1, 9, 0));
        svc.create(OWNER, create_input("A")).await.unwrap();
        svc.create(OWNER, create_input("B")).await.unwrap();
        svc.create(STRANGER, create_input("C")).await.unwrap();

        let names: Vec<_> = svc
            .list(OWNER)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, ["A", "B"]);
    }

    // -----------------------------------------------------------------------
    // update
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn update_routes_completion_through_lifecycle() {
        let svc = service(at(1, 9, 0));
        let habit = svc.create(OWNER, create_input("Walk")).await.unwrap();

        let done = svc.update(habit.id, OWNER, complete()).await.unwrap();
        assert!(done.is_completed);
        assert_eq!(done.streak, 1);
        assert_eq!(done.last_completed, Some(at(1, 9, 0)));

        svc.clock().advance(Duration::minutes(5));
        let again = svc.update(habit.id, OWNER, complete()).await.unwrap();
        assert_eq!(again.streak, 1, "re-completion must not re-increment");
        assert_eq!(again.last_completed, Some(at(1, 9, 0)));
        assert_eq!(again.updated_at, at(1, 9, 5));

        let undone = svc
            .update(
                habit.id,
                OWNER,
                HabitPatch {
                    is_completed: Some(false),
                    ..HabitPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(!undone.is_completed);
        assert_eq!(undone.streak, 0);
    }

    #[tokio::test]
    async fn update_applies_field_patches() {
        let svc = service(at(1, 9, 0));
        let habit = svc.create(OWNER, create_input("Old")).await.unwrap();

        let patch = HabitPatch {
            name: Some("New".into()),
            description: Some("every morning".into()),
            reset_time: Some("04:15".into()),
            timezone: Some("Asia/Kolkata".into()),
            is_completed: None,
        };
        let updated = svc.update(habit.id, OWNER, patch).await.unwrap();

        assert_eq!(updated.name, "New");
        assert_eq!(updated.description.as_deref(), Some("every morning"));
        assert_eq!(updated.reset_time, NaiveTime::from_hms_opt(4, 15, 0).unwrap());
        assert_eq!(updated.timezone.to_string(), "Asia/Kolkata");
        assert_eq!(svc.get(habit.id, OWNER).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn invalid_patch_changes_nothing() {
        let svc = service(at(1, 9, 0));
        let habit = svc.create(OWNER, create_input("Keep")).await.unwrap();

        let patch = HabitPatch {
            name: Some("Renamed".into()),
            reset_time: Some("99:99".into()),
            is_completed: Some(true),
            ..HabitPatch::default()
        };
        assert_matches!(
            svc.update(habit.id, OWNER, patch).await,
            Err(CoreError::Validation(_))
        );
        assert_eq!(svc.get(habit.id, OWNER).await.unwrap(), habit);
    }

    #[tokio::test]
    async fn update_by_stranger_is_not_found() {
        let svc = service(at(1, 9, 0));
        let habit = svc.create(OWNER, create_input("Mine")).await.unwrap();

        assert_matches!(
            svc.update(habit.id, STRANGER, complete()).await,
            Err(CoreError::NotFound { .. })
        );
        assert!(!svc.get(habit.id, OWNER).await.unwrap().is_completed);
    }

    // -----------------------------------------------------------------------
    // delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_is_ownership_checked() {
        let svc = service(at(1, 9, 0));
        let habit = svc.create(OWNER, create_input("Gone")).await.unwrap();

        assert_matches!(
            svc.delete(habit.id, STRANGER).await,
            Err(CoreError::NotFound { .. })
        );
        svc.delete(habit.id, OWNER).await.unwrap();
        assert_matches!(
            svc.delete(habit.id, OWNER).await,
            Err(CoreError::NotFound { .. })
        );
    }

    // -----------------------------------------------------------------------
    // reset_all / stats
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn reset_all_follows_reset_boundaries() {
        // Completed at 06:30 on day D with a 06:00 UTC reset.
        let svc = service(at(10, 6, 30));
        let habit = svc.create(OWNER, create_input("Meditate")).await.unwrap();
        svc.update(habit.id, OWNER, complete()).await.unwrap();

        // 05:00 on D+1: boundary is 06:00 on D, completion still counts.
        svc.clock().set(at(11, 5, 0));
        let summary = svc.reset_all(OWNER).await.unwrap();
        assert_eq!(summary.examined, 1);
        assert!(summary.reset.is_empty());
        assert!(svc.get(habit.id, OWNER).await.unwrap().is_completed);

        // 07:00 on D+1: boundary is 06:00 on D+1, completion is stale.
        svc.clock().set(at(11, 7, 0));
        let summary = svc.reset_all(OWNER).await.unwrap();
        assert_eq!(summary.reset, vec![habit.id]);
        let stored = svc.get(habit.id, OWNER).await.unwrap();
        assert!(!stored.is_completed);
        assert_eq!(stored.streak, 1, "sweep leaves the streak alone");

        // Idempotent.
        let summary = svc.reset_all(OWNER).await.unwrap();
        assert!(summary.reset.is_empty());
    }

    #[tokio::test]
    async fn reset_all_only_writes_changed_habits_of_owner() {
        let svc = service(at(10, 12, 0));
        let stale = svc.create(OWNER, create_input("Stale")).await.unwrap();
        let fresh = svc.create(OWNER, create_input("Fresh")).await.unwrap();
        let idle = svc.create(OWNER, create_input("Idle")).await.unwrap();
        let other = svc.create(STRANGER, create_input("Other")).await.unwrap();

        svc.update(stale.id, OWNER, complete()).await.unwrap();
        svc.update(other.id, STRANGER, complete()).await.unwrap();

        svc.clock().set(at(11, 8, 0));
        svc.update(fresh.id, OWNER, complete()).await.unwrap();

        let summary = svc.reset_all(OWNER).await.unwrap();
        assert_eq!(summary.examined, 3);
        assert_eq!(summary.reset, vec![stale.id]);
        assert!(summary.failed.is_empty());

        assert!(svc.get(fresh.id, OWNER).await.unwrap().is_completed);
        assert!(!svc.get(idle.id, OWNER).await.unwrap().is_completed);
        assert!(
            svc.get(other.id, STRANGER).await.unwrap().is_completed,
            "another user's habits are untouched"
        );
    }

    #[tokio::test]
    async fn reset_all_isolates_write_failures() {
        let svc = service(at(10, 12, 0));
        let a = svc.create(OWNER, create_input("A")).await.unwrap();
        let b = svc.create(OWNER, create_input("B")).await.unwrap();
        let c = svc.create(OWNER, create_input("C")).await.unwrap();
        for id in [a.id, b.id, c.id] {
            svc.update(id, OWNER, complete()).await.unwrap();
        }

        svc.store.fail_updates_for(b.id);
        svc.clock().set(at(12, 12, 0));

        let summary = svc.reset_all(OWNER).await.unwrap();
        assert_eq!(summary.examined, 3);
        assert_eq!(summary.reset, vec![a.id, c.id]);
        assert_eq!(summary.failed, vec![b.id]);

        assert!(!svc.store.row(a.id).unwrap().is_completed);
        assert!(svc.store.row(b.id).unwrap().is_completed);
        assert!(!svc.store.row(c.id).unwrap().is_completed);
    }

    #[tokio::test]
    async fn stats_reflect_stored_flags() {
        let svc = service(at(10, 12, 0));
        assert_eq!(svc.stats(OWNER).await.unwrap().completion_rate, 0.0);

        let a = svc.create(OWNER, create_input("A")).await.unwrap();
        svc.create(OWNER, create_input("B")).await.unwrap();
        svc.update(a.id, OWNER, complete()).await.unwrap();

        let stats = svc.stats(OWNER).await.unwrap();
        assert_eq!(stats.total_habits, 2);
        assert_eq!(stats.completed_today, 1);
        assert!((stats.completion_rate - 0.5).abs() < f64::EPSILON);

        svc.clock().set(at(11, 12, 0));
        svc.reset_all(OWNER).await.unwrap();
        assert_eq!(svc.stats(OWNER).await.unwrap().completed_today, 0);
    }
}
