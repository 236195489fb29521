//! Route definitions for the `/films` resource.
//!
//! Also nests the caller's vote under `/films/{id}/vote`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{film, vote};
use crate::state::AppState;

/// Routes mounted at `/films`.
///
/// Static segments (`/search`, `/popular`, ...) win over `/{id}`.
///
/// ```text
/// GET    /                               -> list
/// POST   /                               -> create (admin)
/// GET    /search                         -> search
/// GET    /popular                        -> popular
/// GET    /upcoming                       -> upcoming
/// GET    /now-playing                    -> now_playing
/// GET    /{id}                           -> get_by_id
/// PUT    /{id}                           -> update (admin)
/// DELETE /{id}                           -> delete (admin)
/// GET    /{id}/details                   -> details
/// GET    /{id}/cinemas                   -> cinemas
/// GET    /{id}/sessions                  -> sessions
/// POST   /{id}/actors/{actor_id}         -> attach_actor (admin)
/// DELETE /{id}/actors/{actor_id}         -> detach_actor (admin)
/// PUT    /{id}/translations/{lang}       -> upsert_translation (admin)
///
/// GET    /{id}/vote                      -> vote::get_own
/// POST   /{id}/vote                      -> vote::upsert
/// DELETE /{id}/vote                      -> vote::remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(film::list).post(film::create))
        .route("/search", get(film::search))
        .route("/popular", get(film::popular))
        .route("/upcoming", get(film::upcoming))
        .route("/now-playing", get(film::now_playing))
        .route(
            "/{id}",
            get(film::get_by_id).put(film::update).delete(film::delete),
        )
        .route("/{id}/details", get(film::details))
        .route("/{id}/cinemas", get(film::cinemas))
        .route("/{id}/sessions", get(film::sessions))
        .route(
            "/{id}/actors/{actor_id}",
            post(film::attach_actor).delete(film::detach_actor),
        )
        .route("/{id}/translations/{lang}", put(film::upsert_translation))
        .route(
            "/{id}/vote",
            get(vote::get_own).post(vote::upsert).delete(vote::remove),
        )
}
