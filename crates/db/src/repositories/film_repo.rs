//! Repository for the `films` table.
//!
//! `vote_average` / `vote_count` are written only by [`FilmRepo::set_vote_aggregate`],
//! which the rating service calls inside the same transaction as the vote change.

use chrono::NaiveDate;
use kino_core::rating::VoteAggregate;
use kino_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::film::{CreateFilm, Film, FilmWithBookings, UpdateFilm};

const COLUMNS: &str = "id, title, overview, tagline, release_date, runtime, poster_url, \
                       background_url, genres, vote_average, vote_count, created_at, updated_at";

/// Same columns qualified with the `f` alias, for joins.
const F_COLUMNS: &str = "f.id, f.title, f.overview, f.tagline, f.release_date, f.runtime, \
                         f.poster_url, f.background_url, f.genres, f.vote_average, f.vote_count, \
                         f.created_at, f.updated_at";

pub struct FilmRepo;

impl FilmRepo {
    /// Insert a film. Actor links are added separately by the caller.
    pub async fn create(conn: &mut PgConnection, input: &CreateFilm) -> Result<Film, sqlx::Error> {
        let query = format!(
            "INSERT INTO films
                (title, overview, tagline, release_date, runtime, poster_url, background_url, genres)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(&input.title)
            .bind(&input.overview)
            .bind(&input.tagline)
            .bind(input.release_date)
            .bind(input.runtime)
            .bind(&input.poster_url)
            .bind(&input.background_url)
            .bind(Json(&input.genres))
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Film>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM films WHERE id = $1");
        sqlx::query_as::<_, Film>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a film row for the rest of the transaction.
    ///
    /// Vote mutations take this lock first so that aggregate recomputation
    /// for one film is serialized.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM films WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Film>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM films ORDER BY release_date DESC, id DESC");
        sqlx::query_as::<_, Film>(&query).fetch_all(pool).await
    }

    /// Case-insensitive substring match on the base title and on any translated title.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<Film>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(term));
        let query = format!(
            "SELECT {COLUMNS} FROM films f
             WHERE f.title ILIKE $1
                OR EXISTS (
                    SELECT 1 FROM film_translations t
                    WHERE t.film_id = f.id AND t.title ILIKE $1
                )
             ORDER BY f.release_date DESC, f.id DESC"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Films releasing after `today`, soonest first.
    pub async fn list_upcoming(
        pool: &PgPool,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Film>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM films
             WHERE release_date > $1
             ORDER BY release_date, id
             LIMIT $2"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(today)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Distinct films with at least one session dated within `from..=to`.
    pub async fn list_now_playing(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Film>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS} FROM films f
             WHERE EXISTS (
                SELECT 1 FROM movie_sessions s
                WHERE s.film_id = f.id AND s.date BETWEEN $1 AND $2
             )
             ORDER BY f.release_date DESC, f.id DESC"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Films released on or after `since` with their live booking counts.
    ///
    /// Cancelled bookings are not counted.
    pub async fn list_popularity_candidates(
        pool: &PgPool,
        since: NaiveDate,
    ) -> Result<Vec<FilmWithBookings>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS}, COUNT(b.id) AS booking_count
             FROM films f
             LEFT JOIN movie_sessions s ON s.film_id = f.id
             LEFT JOIN bookings b ON b.session_id = s.id AND b.status <> 'CANCELLED'
             WHERE f.release_date >= $1
             GROUP BY f.id"
        );
        sqlx::query_as::<_, FilmWithBookings>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Update descriptive fields. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFilm,
    ) -> Result<Option<Film>, sqlx::Error> {
        let query = format!(
            "UPDATE films SET
                title = COALESCE($2, title),
                overview = COALESCE($3, overview),
                tagline = COALESCE($4, tagline),
                release_date = COALESCE($5, release_date),
                runtime = COALESCE($6, runtime),
                poster_url = COALESCE($7, poster_url),
                background_url = COALESCE($8, background_url),
                genres = COALESCE($9, genres)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.overview)
            .bind(&input.tagline)
            .bind(input.release_date)
            .bind(input.runtime)
            .bind(&input.poster_url)
            .bind(&input.background_url)
            .bind(input.genres.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a film. Sessions, bookings, votes and translations cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link several actors to a film in one statement.
    pub async fn add_actors(
        conn: &mut PgConnection,
        film_id: DbId,
        actor_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if actor_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO film_actors (film_id, actor_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT (film_id, actor_id) DO NOTHING",
        )
        .bind(film_id)
        .bind(actor_ids)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Write the derived rating columns.
    pub async fn set_vote_aggregate(
        conn: &mut PgConnection,
        id: DbId,
        aggregate: &VoteAggregate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE films SET vote_average = $2, vote_count = $3 WHERE id = $1")
            .bind(id)
            .bind(aggregate.vote_average)
            .bind(aggregate.vote_count)
            .execute(conn)
            .await?;
        Ok(())
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
