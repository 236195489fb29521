//! Proxy for the external movie-metadata service.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub language: Option<String>,
}

/// GET /api/v1/tmdb/popular?language=
///
/// Passes the upstream JSON through unchanged. 503 when no token is
/// configured or the upstream call fails.
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> AppResult<Json<serde_json::Value>> {
    let client = state.tmdb.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Movie metadata service is not configured".into())
    })?;
    let body = client
        .popular(params.language.as_deref())
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("Movie metadata request failed: {e}")))?;
    Ok(Json(body))
}
