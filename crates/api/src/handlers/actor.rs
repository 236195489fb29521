//! Handlers for the `/actors` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kino_core::types::DbId;
use kino_db::models::actor::{Actor, CreateActor, UpdateActor};
use kino_db::repositories::ActorRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/actors
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateActor>,
) -> AppResult<(StatusCode, Json<Actor>)> {
    let actor = ActorRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(actor)))
}

/// GET /api/v1/actors
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Actor>>> {
    let actors = ActorRepo::list(&state.pool).await?;
    Ok(Json(actors))
}

/// GET /api/v1/actors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Actor>> {
    let actor = ActorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Actor", id))?;
    Ok(Json(actor))
}

/// PUT /api/v1/actors/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActor>,
) -> AppResult<Json<Actor>> {
    let actor = ActorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Actor", id))?;
    Ok(Json(actor))
}

/// DELETE /api/v1/actors/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ActorRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Actor", id))
    }
}
