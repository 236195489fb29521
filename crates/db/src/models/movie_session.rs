//! Movie session model and DTOs.
//!
//! `available_seats` is absent from [`UpdateMovieSession`]: after creation it
//! moves only through `MovieSessionRepo::reserve_seats` / `release_seats`.

use chrono::{NaiveDate, NaiveTime};
use kino_core::error::CoreError;
use kino_core::pricing::SessionPriceFields;
use kino_core::session::SessionLanguage;
use kino_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `movie_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieSession {
    pub id: DbId,
    pub film_id: DbId,
    pub cinema_id: DbId,
    pub hall_id: DbId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub language: String,
    pub available_seats: i32,
    pub price_adult: Option<Money>,
    pub price_student: Option<Money>,
    pub price_child: Option<Money>,
    pub price_adult_night: Option<Money>,
    pub price_student_night: Option<Money>,
    pub price_child_night: Option<Money>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MovieSession {
    pub fn price_fields(&self) -> SessionPriceFields {
        SessionPriceFields {
            price_adult: self.price_adult,
            price_student: self.price_student,
            price_child: self.price_child,
            price_adult_night: self.price_adult_night,
            price_student_night: self.price_student_night,
            price_child_night: self.price_child_night,
        }
    }

    pub fn language(&self) -> Result<SessionLanguage, CoreError> {
        self.language.parse()
    }
}

/// A session joined with its cinema and hall names, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct SessionListing {
    #[sqlx(flatten)]
    pub session: MovieSession,
    pub cinema_name: String,
    pub hall_name: String,
}

/// DTO for scheduling a session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovieSession {
    pub film_id: DbId,
    pub cinema_id: DbId,
    pub hall_id: DbId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub language: SessionLanguage,
    /// Defaults to the hall capacity.
    pub available_seats: Option<i32>,
    #[serde(flatten)]
    pub prices: SessionPriceFields,
}

/// DTO for rescheduling or repricing a session. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMovieSession {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub language: Option<SessionLanguage>,
    #[serde(flatten)]
    pub prices: SessionPriceFields,
}

/// Filters for `GET /sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilter {
    pub film_id: Option<DbId>,
    pub cinema_id: Option<DbId>,
    pub date: Option<NaiveDate>,
}
