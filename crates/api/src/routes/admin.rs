//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users       -> list
/// DELETE /users/{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(user::list))
        .route("/users/{id}", delete(user::delete))
}
