//! Account removal.
//!
//! Deleting a user cascades to their bookings and votes in the database.
//! Before that happens, seats held by their live bookings are returned to
//! the sessions and, afterwards, the ratings of every film they voted on are
//! recomputed, all in the same transaction.

use kino_core::booking::BookingStatus;
use kino_core::types::DbId;
use kino_db::repositories::{BookingRepo, FilmRepo, UserRepo, VoteRepo};
use kino_db::DbPool;

use super::rating::recompute_aggregate;
use super::retry::with_retry;
use super::seat_inventory;
use crate::error::{AppError, AppResult};

pub async fn delete_user(pool: &DbPool, user_id: DbId) -> AppResult<()> {
    with_retry("User deletion", || delete_once(pool, user_id)).await
}

async fn delete_once(pool: &DbPool, user_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let held = BookingRepo::held_for_user(&mut *tx, user_id).await?;
    for booking in &held {
        BookingRepo::update_status(&mut *tx, booking.id, BookingStatus::Cancelled).await?;
        seat_inventory::release_seats(&mut *tx, booking.session_id, booking.seat_count).await?;
    }

    // Film locks in id order, same as a vote mutation would take them.
    let film_ids = VoteRepo::film_ids_for_user(&mut *tx, user_id).await?;
    for &film_id in &film_ids {
        FilmRepo::lock_for_update(&mut *tx, film_id).await?;
    }

    if !UserRepo::delete(&mut *tx, user_id).await? {
        return Err(AppError::not_found("User", user_id));
    }

    for &film_id in &film_ids {
        recompute_aggregate(&mut *tx, film_id).await?;
    }

    tx.commit().await?;

    tracing::info!(
        user_id,
        released_bookings = held.len(),
        rescored_films = film_ids.len(),
        "User deleted"
    );
    Ok(())
}
