//! Film, translation and cast models and DTOs.
//!
//! `vote_average` and `vote_count` are derived columns. No DTO here carries
//! them; only `FilmRepo::set_vote_aggregate` writes them.

use chrono::NaiveDate;
use kino_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `films` table.
#[derive(Debug, Clone, FromRow)]
pub struct Film {
    pub id: DbId,
    pub title: String,
    pub overview: String,
    pub tagline: String,
    pub release_date: NaiveDate,
    pub runtime: i32,
    pub poster_url: Option<String>,
    pub background_url: Option<String>,
    pub genres: Json<Vec<String>>,
    pub vote_average: f64,
    pub vote_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A film with the number of bookings made across all of its sessions.
#[derive(Debug, Clone, FromRow)]
pub struct FilmWithBookings {
    #[sqlx(flatten)]
    pub film: Film,
    pub booking_count: i64,
}

/// DTO for creating a film.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFilm {
    pub title: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: NaiveDate,
    pub runtime: i32,
    pub poster_url: Option<String>,
    pub background_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub actor_ids: Vec<DbId>,
}

/// DTO for updating a film. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFilm {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i32>,
    pub poster_url: Option<String>,
    pub background_url: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// A row from the `film_translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FilmTranslation {
    pub id: DbId,
    pub film_id: DbId,
    pub language_code: String,
    pub title: String,
    pub overview: String,
    pub tagline: String,
}

/// DTO for creating or replacing the translation of a film in one language.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertFilmTranslation {
    pub title: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
}
