//! Repository for the `bookings` table.
//!
//! Creation and status changes take a `&mut PgConnection`: they are always
//! paired with a seat counter change in the same transaction.

use chrono::NaiveDate;
use kino_core::booking::BookingStatus;
use kino_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{Booking, BookingDetail, CreateBooking};

const COLUMNS: &str = "id, user_id, session_id, seats, seat_count, status, total_price, \
                       booked_at, updated_at";

/// Booking columns plus the joined session, film and venue fields.
const DETAIL_SELECT: &str = "SELECT b.id, b.user_id, b.session_id, b.seats, b.seat_count, \
                             b.status, b.total_price, b.booked_at, b.updated_at, \
                             s.date AS session_date, s.time AS session_time, \
                             s.language AS session_language, \
                             f.id AS film_id, f.title AS film_title, \
                             c.id AS cinema_id, c.name AS cinema_name, h.name AS hall_name \
                             FROM bookings b \
                             JOIN movie_sessions s ON s.id = b.session_id \
                             JOIN films f ON f.id = s.film_id \
                             JOIN cinemas c ON c.id = s.cinema_id \
                             JOIN halls h ON h.id = s.hall_id";

pub struct BookingRepo;

impl BookingRepo {
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateBooking,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (user_id, session_id, seats, seat_count, status, total_price)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.user_id)
            .bind(input.session_id)
            .bind(Json(&input.seats))
            .bind(input.seat_count)
            .bind(input.status.as_str())
            .bind(input.total_price)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE b.id = $1");
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a booking and lock its row until the transaction ends.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: BookingStatus,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(conn)
            .await
    }

    /// All of a user's bookings, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE b.user_id = $1 ORDER BY b.booked_at DESC, b.id DESC");
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Confirmed bookings for sessions dated `today` or later, soonest first.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
        today: NaiveDate,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE b.user_id = $1 AND b.status = 'CONFIRMED' AND s.date >= $2
             ORDER BY s.date, s.time, b.id"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    /// Lock every booking of a user that still holds seats.
    pub async fn held_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE user_id = $1 AND status IN ('PENDING', 'CONFIRMED')
             ORDER BY id
             FOR UPDATE"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(conn)
            .await
    }

    /// Seat numbers held by live bookings of a session. Count-only bookings
    /// contribute nothing.
    pub async fn taken_seat_numbers(
        conn: &mut PgConnection,
        session_id: DbId,
    ) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT (seat ->> 'number')::INT
             FROM bookings b,
                  jsonb_array_elements(
                      CASE WHEN jsonb_typeof(b.seats) = 'array' THEN b.seats ELSE '[]'::jsonb END
                  ) AS seat
             WHERE b.session_id = $1 AND b.status <> 'CANCELLED'",
        )
        .bind(session_id)
        .fetch_all(conn)
        .await
    }
}
