//! Handlers for the `/bookings` resource.
//!
//! Regular users only ever see their own bookings; someone else's booking
//! id answers 404. Administrators see all of them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use kino_core::booking::{BookingStatus, SeatSelection};
use kino_core::types::{DbId, Money, Timestamp};
use kino_db::models::booking::BookingDetail;
use kino_db::repositories::BookingRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::services::booking::{
    cancel_booking, confirm_booking, create_booking, Actor, BookingRequest,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /bookings`.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub session_id: DbId,
    /// A seat count or a list of `{number, ticket_type}`.
    pub seats: SeatSelection,
    pub total_price: Option<Money>,
    /// Create as `PENDING` and confirm later.
    #[serde(default)]
    pub hold: bool,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub seats: SeatSelection,
    pub seat_count: i32,
    pub status: BookingStatus,
    pub total_price: Money,
    pub booked_at: Timestamp,
    pub session_date: NaiveDate,
    /// `HH:MM`.
    pub session_time: String,
    pub session_language: String,
    pub film_id: DbId,
    pub film_title: String,
    pub cinema_id: DbId,
    pub cinema_name: String,
    pub hall_name: String,
    /// Confirmed and the session has not started yet.
    pub active: bool,
}

impl BookingResponse {
    fn from_detail(detail: BookingDetail, now: Timestamp) -> AppResult<Self> {
        let status = detail.booking.status()?;
        Ok(Self {
            id: detail.booking.id,
            user_id: detail.booking.user_id,
            session_id: detail.booking.session_id,
            seats: detail.booking.seats.0,
            seat_count: detail.booking.seat_count,
            status,
            total_price: detail.booking.total_price,
            booked_at: detail.booking.booked_at,
            session_time: detail.session_time.format("%H:%M").to_string(),
            active: is_active(status, detail.session_date, detail.session_time, now),
            session_date: detail.session_date,
            session_language: detail.session_language,
            film_id: detail.film_id,
            film_title: detail.film_title,
            cinema_id: detail.cinema_id,
            cinema_name: detail.cinema_name,
            hall_name: detail.hall_name,
        })
    }
}

/// Session start times are compared as UTC wall-clock times.
pub fn is_active(status: BookingStatus, date: NaiveDate, time: NaiveTime, now: Timestamp) -> bool {
    status == BookingStatus::Confirmed && date.and_time(time) > now.naive_utc()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let request = BookingRequest {
        session_id: input.session_id,
        seats: input.seats,
        total_price: input.total_price,
        hold: input.hold,
    };
    let booking = create_booking(&state.pool, user.user_id, &request).await?;
    let response = booking_response(&state, booking.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/bookings
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let rows = BookingRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(to_responses(rows)?))
}

/// GET /api/v1/bookings/active
pub async fn list_active(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let today = Utc::now().date_naive();
    let rows = BookingRepo::list_active_for_user(&state.pool, user.user_id, today).await?;
    Ok(Json(to_responses(rows)?))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookingResponse>> {
    let detail = BookingRepo::find_detail(&state.pool, id)
        .await?
        .filter(|d| user.is_admin() || d.booking.user_id == user.user_id)
        .ok_or_else(|| AppError::not_found("Booking", id))?;
    Ok(Json(BookingResponse::from_detail(detail, Utc::now())?))
}

/// POST /api/v1/bookings/{id}/confirm
pub async fn confirm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookingResponse>> {
    confirm_booking(&state.pool, id, actor_for(&user)).await?;
    Ok(Json(booking_response(&state, id).await?))
}

/// POST /api/v1/bookings/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookingResponse>> {
    cancel_booking(&state.pool, id, actor_for(&user)).await?;
    Ok(Json(booking_response(&state, id).await?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn actor_for(user: &AuthUser) -> Actor {
    if user.is_admin() {
        Actor::Staff
    } else {
        Actor::Owner(user.user_id)
    }
}

/// Load a booking with its session context and render it.
pub(crate) async fn booking_response(state: &AppState, id: DbId) -> AppResult<BookingResponse> {
    let detail = BookingRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", id))?;
    BookingResponse::from_detail(detail, Utc::now())
}

fn to_responses(rows: Vec<BookingDetail>) -> AppResult<Vec<BookingResponse>> {
    let now = Utc::now();
    rows.into_iter()
        .map(|d| BookingResponse::from_detail(d, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn confirmed_future_booking_is_active() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        let time = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        assert!(is_active(BookingStatus::Confirmed, date, time, at(2026, 5, 10, 18)));
        assert!(!is_active(BookingStatus::Confirmed, date, time, at(2026, 5, 10, 19)));
        assert!(!is_active(BookingStatus::Confirmed, date, time, at(2026, 5, 11, 9)));
    }

    #[test]
    fn only_confirmed_bookings_are_active() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let now = at(2026, 1, 1, 0);
        assert!(!is_active(BookingStatus::Pending, date, time, now));
        assert!(!is_active(BookingStatus::Cancelled, date, time, now));
    }
}
