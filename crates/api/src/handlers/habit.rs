//! Handlers for the `/habits` resource.
//!
//! Every handler is scoped to the authenticated user and delegates to the
//! habit service, which enforces ownership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tally_core::habit::service::ResetSummary;
use tally_core::habit::stats::HabitStats;
use tally_core::habit::{CreateHabit, Habit, HabitPatch};
use tally_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/habits
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateHabit>,
) -> AppResult<(StatusCode, Json<Habit>)> {
    let habit = state.habit_service().create(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

/// GET /api/v1/habits
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Habit>>> {
    let habits = state.habit_service().list(auth.user_id).await?;
    Ok(Json(habits))
}

/// GET /api/v1/habits/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Habit>> {
    let habit = state.habit_service().get(id, auth.user_id).await?;
    Ok(Json(habit))
}

/// PUT /api/v1/habits/{id}
///
/// Partial update. `is_completed` drives the streak rules rather than being
/// stored as sent.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<HabitPatch>,
) -> AppResult<Json<Habit>> {
    let habit = state.habit_service().update(id, auth.user_id, patch).await?;
    Ok(Json(habit))
}

/// DELETE /api/v1/habits/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.habit_service().delete(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/habits/stats
pub async fn stats(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<HabitStats>> {
    let stats = state.habit_service().stats(auth.user_id).await?;
    Ok(Json(stats))
}

/// POST /api/v1/habits/reset
///
/// Runs a reset sweep over the caller's habits right away instead of waiting
/// for the background job.
pub async fn reset(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ResetSummary>> {
    let summary = state.habit_service().reset_all(auth.user_id).await?;
    Ok(Json(summary))
}
