//! Repository for the `cinemas` table.

use kino_core::types::DbId;
use sqlx::PgPool;

use crate::models::cinema::{Cinema, CreateCinema, UpdateCinema};

const COLUMNS: &str = "id, name, address, contact_number, created_at, updated_at";

pub struct CinemaRepo;

impl CinemaRepo {
    pub async fn create(pool: &PgPool, input: &CreateCinema) -> Result<Cinema, sqlx::Error> {
        let query = format!(
            "INSERT INTO cinemas (name, address, contact_number)
             VALUES ($1, $2, COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.contact_number)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Cinema>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cinemas WHERE id = $1");
        sqlx::query_as::<_, Cinema>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Cinema>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cinemas ORDER BY name, id");
        sqlx::query_as::<_, Cinema>(&query).fetch_all(pool).await
    }

    /// Cinemas with at least one session of the given film.
    pub async fn list_for_film(pool: &PgPool, film_id: DbId) -> Result<Vec<Cinema>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cinemas c
             WHERE EXISTS (SELECT 1 FROM movie_sessions s WHERE s.cinema_id = c.id AND s.film_id = $1)
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(film_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCinema,
    ) -> Result<Option<Cinema>, sqlx::Error> {
        let query = format!(
            "UPDATE cinemas SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                contact_number = COALESCE($4, contact_number)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.contact_number)
            .fetch_optional(pool)
            .await
    }

    /// Delete a cinema; its halls, sessions and their bookings cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cinemas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
