//! Handlers for `/films/{id}/vote`: one rating per user and film.

use axum::extract::{Path, State};
use axum::Json;
use kino_core::rating::VoteAggregate;
use kino_core::types::DbId;
use kino_db::models::vote::Vote;
use kino_db::repositories::VoteRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::services::rating::{remove_vote, upsert_vote};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub rating: f64,
}

/// The caller's rating and the film's aggregate after the change.
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub rating: f64,
    #[serde(flatten)]
    pub aggregate: VoteAggregate,
}

/// POST /api/v1/films/{id}/vote
pub async fn upsert(
    State(state): State<AppState>,
    user: AuthUser,
    Path(film_id): Path<DbId>,
    Json(input): Json<VoteRequest>,
) -> AppResult<Json<VoteResponse>> {
    let aggregate = upsert_vote(&state.pool, user.user_id, film_id, input.rating).await?;
    Ok(Json(VoteResponse {
        rating: input.rating,
        aggregate,
    }))
}

/// DELETE /api/v1/films/{id}/vote
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(film_id): Path<DbId>,
) -> AppResult<Json<VoteAggregate>> {
    let aggregate = remove_vote(&state.pool, user.user_id, film_id).await?;
    Ok(Json(aggregate))
}

/// GET /api/v1/films/{id}/vote
pub async fn get_own(
    State(state): State<AppState>,
    user: AuthUser,
    Path(film_id): Path<DbId>,
) -> AppResult<Json<Vote>> {
    let vote = VoteRepo::find(&state.pool, user.user_id, film_id)
        .await?
        .ok_or_else(|| AppError::not_found("Vote", film_id))?;
    Ok(Json(vote))
}
