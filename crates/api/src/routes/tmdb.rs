//! Route definitions for the external movie-metadata proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::tmdb;
use crate::state::AppState;

/// Routes mounted at `/tmdb`.
///
/// ```text
/// GET /popular -> popular (?language=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/popular", get(tmdb::popular))
}
