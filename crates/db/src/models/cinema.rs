//! Cinema and hall models and DTOs.

use kino_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cinemas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cinema {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCinema {
    pub name: String,
    pub address: String,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCinema {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
}

/// A row from the `halls` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hall {
    pub id: DbId,
    pub cinema_id: DbId,
    pub name: String,
    pub capacity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a hall. `cinema_id` comes from the URL path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHall {
    pub name: String,
    pub capacity: i32,
}
