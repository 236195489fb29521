//! Repository for the `movie_sessions` table.
//!
//! `available_seats` is only written by [`MovieSessionRepo::create`],
//! [`MovieSessionRepo::reserve_seats`] and [`MovieSessionRepo::release_seats`].
//! The last two are single conditional statements meant to run inside the
//! booking transaction; the row lock they take is held until commit.

use chrono::NaiveDate;
use kino_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::movie_session::{
    CreateMovieSession, MovieSession, SessionFilter, SessionListing, UpdateMovieSession,
};

const COLUMNS: &str = "id, film_id, cinema_id, hall_id, date, time, language, available_seats, \
                       price_adult, price_student, price_child, price_adult_night, \
                       price_student_night, price_child_night, created_at, updated_at";

const S_COLUMNS: &str = "s.id, s.film_id, s.cinema_id, s.hall_id, s.date, s.time, s.language, \
                         s.available_seats, s.price_adult, s.price_student, s.price_child, \
                         s.price_adult_night, s.price_student_night, s.price_child_night, \
                         s.created_at, s.updated_at";

pub struct MovieSessionRepo;

impl MovieSessionRepo {
    /// Insert a session with an already validated initial seat count.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMovieSession,
        available_seats: i32,
    ) -> Result<MovieSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO movie_sessions
                (film_id, cinema_id, hall_id, date, time, language, available_seats,
                 price_adult, price_student, price_child,
                 price_adult_night, price_student_night, price_child_night)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        let prices = &input.prices;
        sqlx::query_as::<_, MovieSession>(&query)
            .bind(input.film_id)
            .bind(input.cinema_id)
            .bind(input.hall_id)
            .bind(input.date)
            .bind(input.time)
            .bind(input.language.code())
            .bind(available_seats)
            .bind(prices.price_adult)
            .bind(prices.price_student)
            .bind(prices.price_child)
            .bind(prices.price_adult_night)
            .bind(prices.price_student_night)
            .bind(prices.price_child_night)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MovieSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movie_sessions WHERE id = $1");
        sqlx::query_as::<_, MovieSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Same as [`find_by_id`](Self::find_by_id) but on a transaction connection.
    pub async fn find_by_id_in(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<MovieSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movie_sessions WHERE id = $1");
        sqlx::query_as::<_, MovieSession>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List sessions matching every filter that is set, ordered by date and time.
    pub async fn list(
        pool: &PgPool,
        filter: &SessionFilter,
    ) -> Result<Vec<MovieSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movie_sessions
             WHERE ($1::BIGINT IS NULL OR film_id = $1)
               AND ($2::BIGINT IS NULL OR cinema_id = $2)
               AND ($3::DATE IS NULL OR date = $3)
             ORDER BY date, time, id"
        );
        sqlx::query_as::<_, MovieSession>(&query)
            .bind(filter.film_id)
            .bind(filter.cinema_id)
            .bind(filter.date)
            .fetch_all(pool)
            .await
    }

    /// Sessions of one film dated `from..=to`, with cinema and hall names.
    pub async fn list_listings_for_film_between(
        pool: &PgPool,
        film_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SessionListing>, sqlx::Error> {
        let query = format!(
            "SELECT {S_COLUMNS}, c.name AS cinema_name, h.name AS hall_name
             FROM movie_sessions s
             JOIN cinemas c ON c.id = s.cinema_id
             JOIN halls h ON h.id = s.hall_id
             WHERE s.film_id = $1 AND s.date BETWEEN $2 AND $3
             ORDER BY s.date, s.time, s.id"
        );
        sqlx::query_as::<_, SessionListing>(&query)
            .bind(film_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Reschedule or reprice a session. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovieSession,
    ) -> Result<Option<MovieSession>, sqlx::Error> {
        let query = format!(
            "UPDATE movie_sessions SET
                date = COALESCE($2, date),
                time = COALESCE($3, time),
                language = COALESCE($4, language),
                price_adult = COALESCE($5, price_adult),
                price_student = COALESCE($6, price_student),
                price_child = COALESCE($7, price_child),
                price_adult_night = COALESCE($8, price_adult_night),
                price_student_night = COALESCE($9, price_student_night),
                price_child_night = COALESCE($10, price_child_night)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let prices = &input.prices;
        sqlx::query_as::<_, MovieSession>(&query)
            .bind(id)
            .bind(input.date)
            .bind(input.time)
            .bind(input.language.map(|l| l.code()))
            .bind(prices.price_adult)
            .bind(prices.price_student)
            .bind(prices.price_child)
            .bind(prices.price_adult_night)
            .bind(prices.price_student_night)
            .bind(prices.price_child_night)
            .fetch_optional(pool)
            .await
    }

    /// Delete a session; its bookings cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movie_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Seat counter
    // -----------------------------------------------------------------------

    /// Take `count` seats if at least that many are available.
    ///
    /// Returns the remaining seats, or `None` when the session is missing or
    /// has fewer than `count` seats left. Nothing changes in the latter case.
    pub async fn reserve_seats(
        conn: &mut PgConnection,
        id: DbId,
        count: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE movie_sessions
             SET available_seats = available_seats - $2
             WHERE id = $1 AND available_seats >= $2
             RETURNING available_seats",
        )
        .bind(id)
        .bind(count)
        .fetch_optional(conn)
        .await
    }

    /// Return `count` previously reserved seats. `None` if the session is gone.
    pub async fn release_seats(
        conn: &mut PgConnection,
        id: DbId,
        count: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE movie_sessions
             SET available_seats = available_seats + $2
             WHERE id = $1
             RETURNING available_seats",
        )
        .bind(id)
        .bind(count)
        .fetch_optional(conn)
        .await
    }

    /// Current seat count, read on the transaction connection.
    pub async fn available_seats(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT available_seats FROM movie_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
