//! Repository for the `votes` table.
//!
//! Mutations take a `&mut PgConnection` so they run inside the caller's
//! transaction, after the film row has been locked.

use kino_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::vote::Vote;

const COLUMNS: &str = "id, user_id, film_id, rating, created_at, updated_at";

pub struct VoteRepo;

impl VoteRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        film_id: DbId,
    ) -> Result<Option<Vote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM votes WHERE user_id = $1 AND film_id = $2");
        sqlx::query_as::<_, Vote>(&query)
            .bind(user_id)
            .bind(film_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert the user's vote, or overwrite its rating if one exists.
    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: DbId,
        film_id: DbId,
        rating: f64,
    ) -> Result<Vote, sqlx::Error> {
        let query = format!(
            "INSERT INTO votes (user_id, film_id, rating)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, film_id) DO UPDATE SET rating = EXCLUDED.rating
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vote>(&query)
            .bind(user_id)
            .bind(film_id)
            .bind(rating)
            .fetch_one(conn)
            .await
    }

    /// Delete the user's vote. Returns `true` if a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        user_id: DbId,
        film_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM votes WHERE user_id = $1 AND film_id = $2")
            .bind(user_id)
            .bind(film_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every live rating for a film.
    pub async fn ratings_for_film(
        conn: &mut PgConnection,
        film_id: DbId,
    ) -> Result<Vec<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, f64>("SELECT rating FROM votes WHERE film_id = $1")
            .bind(film_id)
            .fetch_all(conn)
            .await
    }

    /// Films the user has voted on, in id order.
    pub async fn film_ids_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT film_id FROM votes WHERE user_id = $1 ORDER BY film_id",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await
    }
}
