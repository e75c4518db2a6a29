use std::sync::Arc;

use tally_core::clock::SystemClock;
use tally_core::habit::service::HabitService;
use tally_db::PgHabitStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tally_db::DbPool,
    /// Server configuration (read by the auth extractor and background jobs).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Habit facade over the shared pool, running on the system clock.
    pub fn habit_service(&self) -> HabitService<PgHabitStore> {
        HabitService::new(PgHabitStore::new(self.pool.clone()), SystemClock)
    }
}
