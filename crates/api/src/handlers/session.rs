//! Handlers for the `/sessions` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kino_core::booking::SeatSelection;
use kino_core::error::CoreError;
use kino_core::pricing::{parse_session_time, price_list, PriceList};
use kino_core::session::initial_available_seats;
use kino_core::types::DbId;
use kino_db::models::movie_session::{
    CreateMovieSession, MovieSession, SessionFilter, UpdateMovieSession,
};
use kino_db::repositories::{HallRepo, MovieSessionRepo};
use serde::Deserialize;

use super::booking::{booking_response, BookingResponse};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services::booking::{create_booking, BookingRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    /// `HH:MM` or `HH:MM:SS`. Defaults to the session's own start time.
    pub time: Option<String>,
}

/// Body of `POST /sessions/{id}/book`.
#[derive(Debug, Deserialize)]
pub struct QuickBookRequest {
    #[serde(default = "one_seat")]
    pub seats: i64,
}

fn one_seat() -> i64 {
    1
}

/// POST /api/v1/sessions
///
/// `available_seats` defaults to the hall capacity and may not exceed it.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateMovieSession>,
) -> AppResult<(StatusCode, Json<MovieSession>)> {
    input.prices.validate()?;

    let hall = HallRepo::find_by_id(&state.pool, input.hall_id)
        .await?
        .ok_or_else(|| AppError::not_found("Hall", input.hall_id))?;
    if hall.cinema_id != input.cinema_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Hall {} does not belong to cinema {}",
            hall.id, input.cinema_id
        ))));
    }
    let available = initial_available_seats(input.available_seats, hall.capacity)?;

    let session = MovieSessionRepo::create(&state.pool, &input, available).await?;
    tracing::info!(
        session_id = session.id,
        film_id = session.film_id,
        hall_id = session.hall_id,
        available_seats = available,
        "Session scheduled"
    );
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions?film_id=&cinema_id=&date=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<SessionFilter>,
) -> AppResult<Json<Vec<MovieSession>>> {
    let sessions = MovieSessionRepo::list(&state.pool, &filter).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/sessions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieSession>> {
    let session = find_session(&state, id).await?;
    Ok(Json(session))
}

/// PUT /api/v1/sessions/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMovieSession>,
) -> AppResult<Json<MovieSession>> {
    input.prices.validate()?;
    let session = MovieSessionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("MovieSession", id))?;
    Ok(Json(session))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MovieSessionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("MovieSession", id))
    }
}

/// GET /api/v1/sessions/{id}/prices?time=HH:MM
pub async fn prices(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PriceParams>,
) -> AppResult<Json<PriceList>> {
    let session = find_session(&state, id).await?;
    let time = match params.time.as_deref() {
        Some(raw) => parse_session_time(raw)?,
        None => session.time,
    };
    Ok(Json(price_list(&session.price_fields(), time)))
}

/// POST /api/v1/sessions/{id}/book
///
/// Confirmed booking of `seats` unnumbered adult seats.
pub async fn book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<QuickBookRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let request = BookingRequest {
        session_id: id,
        seats: SeatSelection::Count(input.seats),
        total_price: None,
        hold: false,
    };
    let booking = create_booking(&state.pool, user.user_id, &request).await?;
    let response = booking_response(&state, booking.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn find_session(state: &AppState, id: DbId) -> AppResult<MovieSession> {
    MovieSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("MovieSession", id))
}
