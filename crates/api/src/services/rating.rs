//! Vote mutations and the film rating aggregate.
//!
//! Each mutation locks the film row, changes the vote, recomputes the
//! aggregate from all live votes and writes it, in one transaction. The
//! film lock serializes concurrent votes on the same film; the
//! `(user_id, film_id)` unique constraint plus `ON CONFLICT` keeps one row
//! per user.

use kino_core::rating::{aggregate, validate_rating, VoteAggregate};
use kino_core::types::DbId;
use kino_db::repositories::{FilmRepo, VoteRepo};
use kino_db::DbPool;
use sqlx::PgConnection;

use super::retry::with_retry;
use crate::error::{AppError, AppResult};

/// Create or replace the user's vote on a film.
pub async fn upsert_vote(
    pool: &DbPool,
    user_id: DbId,
    film_id: DbId,
    rating: f64,
) -> AppResult<VoteAggregate> {
    let rating = validate_rating(rating)?;
    with_retry("Vote", || upsert_once(pool, user_id, film_id, rating)).await
}

async fn upsert_once(
    pool: &DbPool,
    user_id: DbId,
    film_id: DbId,
    rating: f64,
) -> AppResult<VoteAggregate> {
    let mut tx = pool.begin().await?;

    FilmRepo::lock_for_update(&mut *tx, film_id)
        .await?
        .ok_or_else(|| AppError::not_found("Film", film_id))?;
    VoteRepo::upsert(&mut *tx, user_id, film_id, rating).await?;
    let stats = recompute_aggregate(&mut *tx, film_id).await?;

    tx.commit().await?;

    tracing::info!(
        user_id,
        film_id,
        rating,
        vote_average = stats.vote_average,
        vote_count = stats.vote_count,
        "Vote recorded"
    );
    Ok(stats)
}

/// Delete the user's vote on a film. `NotFound` if there is none, in which
/// case the aggregate is left untouched.
pub async fn remove_vote(pool: &DbPool, user_id: DbId, film_id: DbId) -> AppResult<VoteAggregate> {
    with_retry("Vote removal", || remove_once(pool, user_id, film_id)).await
}

async fn remove_once(pool: &DbPool, user_id: DbId, film_id: DbId) -> AppResult<VoteAggregate> {
    let mut tx = pool.begin().await?;

    FilmRepo::lock_for_update(&mut *tx, film_id)
        .await?
        .ok_or_else(|| AppError::not_found("Film", film_id))?;
    if !VoteRepo::delete(&mut *tx, user_id, film_id).await? {
        return Err(AppError::not_found("Vote", film_id));
    }
    let stats = recompute_aggregate(&mut *tx, film_id).await?;

    tx.commit().await?;

    tracing::info!(user_id, film_id, vote_count = stats.vote_count, "Vote removed");
    Ok(stats)
}

/// Recompute and store a film's aggregate from its live votes.
///
/// The caller must hold the film row lock.
pub(crate) async fn recompute_aggregate(
    conn: &mut PgConnection,
    film_id: DbId,
) -> AppResult<VoteAggregate> {
    let ratings = VoteRepo::ratings_for_film(&mut *conn, film_id).await?;
    let stats = aggregate(&ratings);
    FilmRepo::set_vote_aggregate(&mut *conn, film_id, &stats).await?;
    Ok(stats)
}
