use std::sync::Arc;

use kino_tmdb::TmdbClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and the HTTP client are reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kino_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Movie-metadata client, present when `TMDB_API_TOKEN` is configured.
    pub tmdb: Option<TmdbClient>,
}
