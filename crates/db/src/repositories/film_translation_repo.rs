//! Repository for the `film_translations` table.

use kino_core::types::DbId;
use sqlx::PgPool;

use crate::models::film::{FilmTranslation, UpsertFilmTranslation};

const COLUMNS: &str = "id, film_id, language_code, title, overview, tagline";

pub struct FilmTranslationRepo;

impl FilmTranslationRepo {
    /// Create or replace the translation of `film_id` into `language_code`.
    pub async fn upsert(
        pool: &PgPool,
        film_id: DbId,
        language_code: &str,
        input: &UpsertFilmTranslation,
    ) -> Result<FilmTranslation, sqlx::Error> {
        let query = format!(
            "INSERT INTO film_translations (film_id, language_code, title, overview, tagline)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''))
             ON CONFLICT (film_id, language_code) DO UPDATE SET
                title = EXCLUDED.title,
                overview = EXCLUDED.overview,
                tagline = EXCLUDED.tagline
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FilmTranslation>(&query)
            .bind(film_id)
            .bind(language_code)
            .bind(&input.title)
            .bind(&input.overview)
            .bind(&input.tagline)
            .fetch_one(pool)
            .await
    }

    /// Translations of several films into any of `languages`.
    pub async fn list_for_films(
        pool: &PgPool,
        film_ids: &[DbId],
        languages: &[&str],
    ) -> Result<Vec<FilmTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM film_translations
             WHERE film_id = ANY($1) AND language_code = ANY($2)
             ORDER BY film_id, language_code"
        );
        sqlx::query_as::<_, FilmTranslation>(&query)
            .bind(film_ids)
            .bind(languages)
            .fetch_all(pool)
            .await
    }
}
