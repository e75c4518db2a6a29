//! Admin-only routes.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users         -> list
/// POST   /users         -> create
/// PATCH  /users/{id}    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(user::list).post(user::create))
        .route("/users/{id}", patch(user::update))
}
