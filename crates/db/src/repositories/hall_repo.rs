//! Repository for the `halls` table.

use kino_core::types::DbId;
use sqlx::PgPool;

use crate::models::cinema::{CreateHall, Hall};

const COLUMNS: &str = "id, cinema_id, name, capacity, created_at, updated_at";

pub struct HallRepo;

impl HallRepo {
    pub async fn create(
        pool: &PgPool,
        cinema_id: DbId,
        input: &CreateHall,
    ) -> Result<Hall, sqlx::Error> {
        let query = format!(
            "INSERT INTO halls (cinema_id, name, capacity)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hall>(&query)
            .bind(cinema_id)
            .bind(&input.name)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Hall>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM halls WHERE id = $1");
        sqlx::query_as::<_, Hall>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_cinema(pool: &PgPool, cinema_id: DbId) -> Result<Vec<Hall>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM halls WHERE cinema_id = $1 ORDER BY name, id");
        sqlx::query_as::<_, Hall>(&query)
            .bind(cinema_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM halls WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
