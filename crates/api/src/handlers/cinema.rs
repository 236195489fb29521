//! Handlers for the `/cinemas` resource and the halls nested under it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kino_core::error::CoreError;
use kino_core::types::DbId;
use kino_db::models::cinema::{Cinema, CreateCinema, CreateHall, Hall, UpdateCinema};
use kino_db::repositories::{CinemaRepo, HallRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/cinemas
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateCinema>,
) -> AppResult<(StatusCode, Json<Cinema>)> {
    let cinema = CinemaRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(cinema)))
}

/// GET /api/v1/cinemas
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Cinema>>> {
    let cinemas = CinemaRepo::list(&state.pool).await?;
    Ok(Json(cinemas))
}

/// GET /api/v1/cinemas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Cinema>> {
    let cinema = CinemaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Cinema", id))?;
    Ok(Json(cinema))
}

/// PUT /api/v1/cinemas/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCinema>,
) -> AppResult<Json<Cinema>> {
    let cinema = CinemaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Cinema", id))?;
    Ok(Json(cinema))
}

/// DELETE /api/v1/cinemas/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CinemaRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Cinema", id))
    }
}

// ---------------------------------------------------------------------------
// Halls
// ---------------------------------------------------------------------------

/// GET /api/v1/cinemas/{id}/halls
pub async fn list_halls(
    State(state): State<AppState>,
    Path(cinema_id): Path<DbId>,
) -> AppResult<Json<Vec<Hall>>> {
    CinemaRepo::find_by_id(&state.pool, cinema_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cinema", cinema_id))?;
    let halls = HallRepo::list_by_cinema(&state.pool, cinema_id).await?;
    Ok(Json(halls))
}

/// POST /api/v1/cinemas/{id}/halls
pub async fn create_hall(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(cinema_id): Path<DbId>,
    Json(input): Json<CreateHall>,
) -> AppResult<(StatusCode, Json<Hall>)> {
    if input.capacity <= 0 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Hall capacity must be positive, got {}",
            input.capacity
        ))));
    }
    CinemaRepo::find_by_id(&state.pool, cinema_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cinema", cinema_id))?;
    let hall = HallRepo::create(&state.pool, cinema_id, &input).await?;
    Ok((StatusCode::CREATED, Json(hall)))
}

/// DELETE /api/v1/cinemas/{id}/halls/{hall_id}
pub async fn delete_hall(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((cinema_id, hall_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let hall = HallRepo::find_by_id(&state.pool, hall_id)
        .await?
        .filter(|h| h.cinema_id == cinema_id)
        .ok_or_else(|| AppError::not_found("Hall", hall_id))?;
    HallRepo::delete(&state.pool, hall.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
