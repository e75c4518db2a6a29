//! Handlers for the `/items` resource.
//!
//! Items are owner-scoped: a caller only sees items they own, and another
//! user's item answers 404 exactly like a missing one. Admins see every item.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;
use tally_core::error::CoreError;
use tally_core::pagination::{clamp_limit, clamp_offset};
use tally_core::roles::ROLE_ADMIN;
use tally_core::types::DbId;
use tally_core::validation::{validate_optional_text, validate_required_text, MAX_TEXT_LENGTH};
use tally_db::models::item::{CreateItem, Item, UpdateItem};
use tally_db::repositories::ItemRepo;

use super::{Page, PageParams};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Item", id })
}

fn is_admin(auth: &AuthUser) -> bool {
    auth.role == ROLE_ADMIN
}

/// Load an item the caller may act on.
async fn load_visible(pool: &PgPool, auth: &AuthUser, id: DbId) -> AppResult<Item> {
    ItemRepo::find_by_id(pool, id)
        .await?
        .filter(|item| item.owner_id == auth.user_id || is_admin(auth))
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/items
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    validate_required_text("title", &input.title, MAX_TEXT_LENGTH)?;
    validate_optional_text("description", input.description.as_deref(), MAX_TEXT_LENGTH)?;

    let item = ItemRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(item_id = item.id, owner_id = auth.user_id, "Item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/items
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<Item>>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (data, count) = if is_admin(&auth) {
        (
            ItemRepo::list_all(&state.pool, limit, offset).await?,
            ItemRepo::count_all(&state.pool).await?,
        )
    } else {
        (
            ItemRepo::list_by_owner(&state.pool, auth.user_id, limit, offset).await?,
            ItemRepo::count_by_owner(&state.pool, auth.user_id).await?,
        )
    };
    Ok(Json(Page { data, count }))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let item = load_visible(&state.pool, &auth, id).await?;
    Ok(Json(item))
}

/// PUT /api/v1/items/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    if let Some(title) = &input.title {
        validate_required_text("title", title, MAX_TEXT_LENGTH)?;
    }
    validate_optional_text("description", input.description.as_deref(), MAX_TEXT_LENGTH)?;

    load_visible(&state.pool, &auth, id).await?;
    let item = ItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(item))
}

/// DELETE /api/v1/items/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_visible(&state.pool, &auth, id).await?;
    if ItemRepo::delete(&state.pool, id).await? {
        tracing::info!(item_id = id, deleted_by = auth.user_id, "Item deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
