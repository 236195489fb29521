//! Repository for the `actors` table and the `film_actors` link table.

use kino_core::types::DbId;
use sqlx::PgPool;

use crate::models::actor::{Actor, CreateActor, FilmActor, UpdateActor};

const COLUMNS: &str = "id, name, photo_url, bio, created_at, updated_at";

pub struct ActorRepo;

impl ActorRepo {
    pub async fn create(pool: &PgPool, input: &CreateActor) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors (name, photo_url, bio)
             VALUES ($1, $2, COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(&input.name)
            .bind(&input.photo_url)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all actors alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors ORDER BY name, id");
        sqlx::query_as::<_, Actor>(&query).fetch_all(pool).await
    }

    /// Update an actor. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActor,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!(
            "UPDATE actors SET
                name = COALESCE($2, name),
                photo_url = COALESCE($3, photo_url),
                bio = COALESCE($4, bio)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.photo_url)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }

    /// Delete an actor. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Casts of several films in one query, ordered by film then actor name.
    pub async fn list_for_films(
        pool: &PgPool,
        film_ids: &[DbId],
    ) -> Result<Vec<FilmActor>, sqlx::Error> {
        sqlx::query_as::<_, FilmActor>(
            "SELECT fa.film_id, a.id, a.name, a.photo_url, a.bio
             FROM film_actors fa
             JOIN actors a ON a.id = fa.actor_id
             WHERE fa.film_id = ANY($1)
             ORDER BY fa.film_id, a.name, a.id",
        )
        .bind(film_ids)
        .fetch_all(pool)
        .await
    }

    /// Link an actor to a film. Linking twice is a no-op.
    pub async fn attach_to_film(
        pool: &PgPool,
        film_id: DbId,
        actor_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO film_actors (film_id, actor_id) VALUES ($1, $2) \
             ON CONFLICT (film_id, actor_id) DO NOTHING",
        )
        .bind(film_id)
        .bind(actor_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Unlink an actor from a film. Returns `true` if a link was removed.
    pub async fn detach_from_film(
        pool: &PgPool,
        film_id: DbId,
        actor_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM film_actors WHERE film_id = $1 AND actor_id = $2")
            .bind(film_id)
            .bind(actor_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
