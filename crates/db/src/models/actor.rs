//! Actor entity model and DTOs.

use kino_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `actors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub photo_url: Option<String>,
    pub bio: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An actor together with one film they appear in. Used for batch loading casts.
#[derive(Debug, Clone, FromRow)]
pub struct FilmActor {
    pub film_id: DbId,
    pub id: DbId,
    pub name: String,
    pub photo_url: Option<String>,
    pub bio: String,
}

/// Cast member as embedded in film responses.
#[derive(Debug, Clone, Serialize)]
pub struct CastMember {
    pub id: DbId,
    pub name: String,
    pub photo_url: Option<String>,
    pub bio: String,
}

impl From<FilmActor> for CastMember {
    fn from(a: FilmActor) -> Self {
        Self {
            id: a.id,
            name: a.name,
            photo_url: a.photo_url,
            bio: a.bio,
        }
    }
}

/// DTO for creating a new actor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActor {
    pub name: String,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
}

/// DTO for updating an actor. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateActor {
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
}
