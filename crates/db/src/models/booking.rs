//! Booking model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use kino_core::booking::{BookingStatus, SeatSelection};
use kino_core::error::CoreError;
use kino_core::types::{DbId, Money, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub seats: Json<SeatSelection>,
    pub seat_count: i32,
    pub status: String,
    pub total_price: Money,
    pub booked_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    pub fn status(&self) -> Result<BookingStatus, CoreError> {
        self.status.parse()
    }
}

/// A booking joined with the session, film and venue it is for.
#[derive(Debug, Clone, FromRow)]
pub struct BookingDetail {
    #[sqlx(flatten)]
    pub booking: Booking,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub session_language: String,
    pub film_id: DbId,
    pub film_title: String,
    pub cinema_id: DbId,
    pub cinema_name: String,
    pub hall_name: String,
}

/// Insert payload for a booking whose seats have already been reserved.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub user_id: DbId,
    pub session_id: DbId,
    pub seats: SeatSelection,
    pub seat_count: i32,
    pub status: BookingStatus,
    pub total_price: Money,
}
