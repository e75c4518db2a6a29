pub mod admin;
pub mod habit;
pub mod health;
pub mod item;
pub mod project;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /admin/users                     list, create (admin)
/// /admin/users/{id}                update, deactivate (admin)
///
/// /users/me                        current user; update profile; delete own account
///
/// /items                           list, create (owner-scoped)
/// /items/{id}                      get, update, delete
///
/// /projects                        list, create
/// /projects/{id}                   get, update, delete
/// /projects/{id}/tasks             tasks of a project
///
/// /tasks                           create
/// /tasks/{id}                      get, update, delete
///
/// /habits                          list, create
/// /habits/stats                    stats snapshot
/// /habits/reset                    on-demand reset sweep
/// /habits/{id}                     get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/admin", admin::router())
        .nest("/users", user::router())
        .nest("/items", item::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/habits", habit::router())
}
