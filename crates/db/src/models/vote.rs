//! Vote entity model.

use kino_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `votes` table. At most one per (user, film).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vote {
    pub id: DbId,
    pub user_id: DbId,
    pub film_id: DbId,
    pub rating: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
