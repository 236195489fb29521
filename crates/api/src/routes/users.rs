//! Route definitions for the caller's own account.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /me -> me
/// PUT /me -> update_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(user::me).put(user::update_me))
}
