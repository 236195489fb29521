//! Route definitions for the `/cinemas` resource and its halls.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::cinema;
use crate::state::AppState;

/// Routes mounted at `/cinemas`. Writes require the `admin` role.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
///
/// GET    /{id}/halls              -> list_halls
/// POST   /{id}/halls              -> create_hall
/// DELETE /{id}/halls/{hall_id}    -> delete_hall
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cinema::list).post(cinema::create))
        .route(
            "/{id}",
            get(cinema::get_by_id)
                .put(cinema::update)
                .delete(cinema::delete),
        )
        .route(
            "/{id}/halls",
            get(cinema::list_halls).post(cinema::create_hall),
        )
        .route("/{id}/halls/{hall_id}", delete(cinema::delete_hall))
}
