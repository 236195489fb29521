//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`. All require auth.
///
/// ```text
/// GET  /               -> list
/// POST /               -> create
/// GET  /active         -> list_active
/// GET  /{id}           -> get_by_id
/// POST /{id}/confirm   -> confirm
/// POST /{id}/cancel    -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::list).post(booking::create))
        .route("/active", get(booking::list_active))
        .route("/{id}", get(booking::get_by_id))
        .route("/{id}/confirm", post(booking::confirm))
        .route("/{id}/cancel", post(booking::cancel))
}
