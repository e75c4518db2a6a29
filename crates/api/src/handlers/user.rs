//! Handlers for user accounts: admin management and the caller's own record.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use tally_core::error::CoreError;
use tally_core::pagination::{clamp_limit, clamp_offset};
use tally_core::roles::role_for;
use tally_core::types::DbId;
use tally_core::validation::{validate_email, validate_optional_text, MAX_TEXT_LENGTH};
use tally_db::models::user::{CreateUser, UpdateUser, UpdateUserMe, User};
use tally_db::repositories::UserRepo;

use super::{Page, PageParams};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// A user row plus the role name its tokens carry.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub role: &'static str,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let role = role_for(user.is_superuser);
        Self { user, role }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// Reject `email` if another account already holds it.
///
/// Racing writers still hit `uq_users_email`, which maps to the same 409.
async fn ensure_email_free(pool: &PgPool, email: &str, except: Option<DbId>) -> AppResult<()> {
    match UserRepo::find_by_email(pool, email).await? {
        Some(existing) if Some(existing.id) != except => Err(AppError::Core(
            CoreError::Conflict(format!("A user with email '{email}' already exists")),
        )),
        _ => Ok(()),
    }
}

/// Validate and conflict-check the fields both update paths share.
async fn check_update(pool: &PgPool, id: DbId, input: &UpdateUser) -> AppResult<()> {
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    validate_optional_text("full_name", input.full_name.as_deref(), MAX_TEXT_LENGTH)?;
    if let Some(email) = &input.email {
        ensure_email_free(pool, email, Some(id)).await?;
    }
    Ok(())
}

/// POST /api/v1/admin/users
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_email(&input.email)?;
    validate_optional_text("full_name", input.full_name.as_deref(), MAX_TEXT_LENGTH)?;
    ensure_email_free(&state.pool, &input.email, None).await?;

    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/admin/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let count = UserRepo::count(&state.pool).await?;
    Ok(Json(Page {
        data: users.into_iter().map(UserResponse::from).collect(),
        count,
    }))
}

/// PATCH /api/v1/admin/users/{id}
///
/// Also the way to deactivate an account or change its role.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    check_update(&state.pool, id, &input).await?;

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        user_id = id,
        updated_by = admin.user_id,
        is_active = user.is_active,
        "User updated"
    );
    Ok(Json(user.into()))
}

/// GET /api/v1/users/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| not_found(auth.user_id))?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/me
///
/// Only `email` and `full_name` can be changed here.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserMe>,
) -> AppResult<Json<UserResponse>> {
    let input = UpdateUser::from(input);
    check_update(&state.pool, auth.user_id, &input).await?;

    let user = UserRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found(auth.user_id))?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/me
///
/// Removes the caller's account with every habit and item it owns.
pub async fn delete_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    if UserRepo::delete(&state.pool, auth.user_id).await? {
        tracing::info!(user_id = auth.user_id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(auth.user_id))
    }
}
