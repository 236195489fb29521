//! Refresh token model. Only the SHA-256 hash of the token is stored.

use kino_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateRefreshToken {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
