//! Route definitions for the `/sessions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /               -> list (?film_id=&cinema_id=&date=)
/// POST   /               -> create (admin)
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update (admin)
/// DELETE /{id}           -> delete (admin)
/// GET    /{id}/prices    -> prices (?time=HH:MM)
/// POST   /{id}/book      -> book (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::list).post(session::create))
        .route(
            "/{id}",
            get(session::get_by_id)
                .put(session::update)
                .delete(session::delete),
        )
        .route("/{id}/prices", get(session::prices))
        .route("/{id}/book", post(session::book))
}
