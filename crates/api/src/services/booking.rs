//! Booking lifecycle: create, confirm, cancel.
//!
//! Every operation runs in one transaction together with its seat counter
//! change. If any step after the reservation fails the transaction is
//! dropped and the reservation rolls back with it.

use kino_core::booking::{settle_total, BookingStatus, CancelOutcome, SeatSelection};
use kino_core::error::CoreError;
use kino_core::pricing::price_list;
use kino_core::types::{DbId, Money};
use kino_db::models::booking::{Booking, CreateBooking};
use kino_db::repositories::{BookingRepo, MovieSessionRepo};
use kino_db::DbPool;

use super::retry::with_retry;
use super::seat_inventory;
use crate::error::{AppError, AppResult};

/// A booking request after body parsing.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub session_id: DbId,
    pub seats: SeatSelection,
    /// Must equal the server-computed total when present.
    pub total_price: Option<Money>,
    /// Create the booking as `PENDING` instead of `CONFIRMED`.
    pub hold: bool,
}

/// Who may act on an existing booking.
#[derive(Debug, Clone, Copy)]
pub enum Actor {
    /// Only bookings owned by this user are visible.
    Owner(DbId),
    /// Any booking (administrators).
    Staff,
}

impl Actor {
    fn may_access(self, booking: &Booking) -> bool {
        match self {
            Actor::Owner(user_id) => booking.user_id == user_id,
            Actor::Staff => true,
        }
    }
}

/// Reserve seats, price them and persist the booking.
pub async fn create_booking(
    pool: &DbPool,
    user_id: DbId,
    request: &BookingRequest,
) -> AppResult<Booking> {
    with_retry("Booking", || create_once(pool, user_id, request)).await
}

async fn create_once(pool: &DbPool, user_id: DbId, request: &BookingRequest) -> AppResult<Booking> {
    let mut tx = pool.begin().await?;

    let session = MovieSessionRepo::find_by_id_in(&mut *tx, request.session_id)
        .await?
        .ok_or_else(|| AppError::not_found("MovieSession", request.session_id))?;

    let seat_count = request.seats.seat_count()?;
    seat_inventory::reserve_seats(&mut *tx, session.id, i64::from(seat_count)).await?;

    // The session row is locked from here on, so the seat map cannot change
    // under us.
    let requested = request.seats.seat_numbers();
    if !requested.is_empty() {
        let taken = BookingRepo::taken_seat_numbers(&mut *tx, session.id).await?;
        let clashes: Vec<String> = requested
            .iter()
            .filter(|n| taken.contains(n))
            .map(|n| n.to_string())
            .collect();
        if !clashes.is_empty() {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Seats already booked: {}",
                clashes.join(", ")
            ))));
        }
    }

    let prices = price_list(&session.price_fields(), session.time);
    let total_price = settle_total(&prices, &request.seats, request.total_price)?;
    let status = if request.hold {
        BookingStatus::Pending
    } else {
        BookingStatus::Confirmed
    };

    let booking = BookingRepo::create(
        &mut *tx,
        &CreateBooking {
            user_id,
            session_id: session.id,
            seats: request.seats.clone(),
            seat_count,
            status,
            total_price,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        booking_id = booking.id,
        user_id,
        session_id = session.id,
        seat_count,
        status = %status,
        total_price = %total_price,
        "Booking created"
    );
    Ok(booking)
}

/// Move a `PENDING` booking to `CONFIRMED`.
pub async fn confirm_booking(pool: &DbPool, booking_id: DbId, actor: Actor) -> AppResult<Booking> {
    with_retry("Booking confirmation", || confirm_once(pool, booking_id, actor)).await
}

async fn confirm_once(pool: &DbPool, booking_id: DbId, actor: Actor) -> AppResult<Booking> {
    let mut tx = pool.begin().await?;

    let booking = BookingRepo::lock_for_update(&mut *tx, booking_id)
        .await?
        .filter(|b| actor.may_access(b))
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    let next = booking.status()?.transition(BookingStatus::Confirmed)?;
    let booking = BookingRepo::update_status(&mut *tx, booking.id, next).await?;
    tx.commit().await?;

    tracing::info!(booking_id, "Booking confirmed");
    Ok(booking)
}

/// Cancel a booking and give its seats back.
///
/// Cancelling an already cancelled booking returns it unchanged and does
/// not release seats a second time.
pub async fn cancel_booking(pool: &DbPool, booking_id: DbId, actor: Actor) -> AppResult<Booking> {
    with_retry("Booking cancellation", || cancel_once(pool, booking_id, actor)).await
}

async fn cancel_once(pool: &DbPool, booking_id: DbId, actor: Actor) -> AppResult<Booking> {
    let mut tx = pool.begin().await?;

    let booking = BookingRepo::lock_for_update(&mut *tx, booking_id)
        .await?
        .filter(|b| actor.may_access(b))
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    let status = booking.status()?;
    if status.cancel() == CancelOutcome::AlreadyCancelled {
        tracing::debug!(booking_id, "Booking already cancelled");
        return Ok(booking);
    }

    let next = status.transition(BookingStatus::Cancelled)?;
    let cancelled = BookingRepo::update_status(&mut *tx, booking.id, next).await?;
    seat_inventory::release_seats(&mut *tx, booking.session_id, booking.seat_count).await?;
    tx.commit().await?;

    tracing::info!(
        booking_id,
        session_id = booking.session_id,
        released = booking.seat_count,
        "Booking cancelled"
    );
    Ok(cancelled)
}
