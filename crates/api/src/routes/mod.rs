pub mod actors;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod cinemas;
pub mod films;
pub mod health;
pub mod sessions;
pub mod tmdb;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /users/me                                        get, update own profile
///
/// /admin/users                                     list (admin only)
/// /admin/users/{id}                                delete
///
/// /actors                                          list, create
/// /actors/{id}                                     get, update, delete
///
/// /cinemas                                         list, create
/// /cinemas/{id}                                    get, update, delete
/// /cinemas/{id}/halls                              list, create
/// /cinemas/{id}/halls/{hall_id}                    delete
///
/// /films                                           list, create
/// /films/search                                    title search (?query=)
/// /films/popular                                   popularity ranking
/// /films/upcoming                                  unreleased films
/// /films/now-playing                               films with sessions soon
/// /films/{id}                                      get, update, delete
/// /films/{id}/details                              film + sessions by date
/// /films/{id}/cinemas                              cinemas screening it
/// /films/{id}/sessions                             all its sessions
/// /films/{id}/actors/{actor_id}                    attach, detach
/// /films/{id}/translations/{lang}                  upsert translation
/// /films/{id}/vote                                 get, upsert, remove own vote
///
/// /sessions                                        list (filtered), create
/// /sessions/{id}                                   get, update, delete
/// /sessions/{id}/prices                            price list (?time=)
/// /sessions/{id}/book                              quick booking
///
/// /bookings                                        list own, create
/// /bookings/active                                 upcoming confirmed
/// /bookings/{id}                                   get
/// /bookings/{id}/confirm                           PENDING -> CONFIRMED
/// /bookings/{id}/cancel                            cancel, release seats
///
/// /tmdb/popular                                    external popular list
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, refresh, logout).
        .nest("/auth", auth::router())
        // Own profile.
        .nest("/users", users::router())
        // User management.
        .nest("/admin", admin::router())
        // Catalog.
        .nest("/actors", actors::router())
        .nest("/cinemas", cinemas::router())
        .nest("/films", films::router())
        // Scheduling and booking.
        .nest("/sessions", sessions::router())
        .nest("/bookings", bookings::router())
        // External movie metadata.
        .nest("/tmdb", tmdb::router())
}
