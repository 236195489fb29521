//! Seat reservation against a session's `available_seats` counter.
//!
//! Both operations take the caller's transaction connection. The guarded
//! `UPDATE` locks the session row until that transaction ends, so concurrent
//! reservations for one session are serialized and the counter never drops
//! below zero.

use kino_core::booking::{check_capacity, validate_seat_count};
use kino_core::error::CoreError;
use kino_core::types::DbId;
use kino_db::repositories::MovieSessionRepo;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::services::retry::MAX_ATTEMPTS;

/// Take `count` seats from a session. Returns the seats left.
///
/// Fails with `Validation` for a non-positive count, `NotFound` for a missing
/// session and `InsufficientCapacity` when fewer than `count` seats remain.
/// Nothing is written on failure.
pub async fn reserve_seats(conn: &mut PgConnection, session_id: DbId, count: i64) -> AppResult<i32> {
    let count = validate_seat_count(count)?;

    let mut attempt = 1;
    loop {
        if let Some(remaining) =
            MovieSessionRepo::reserve_seats(&mut *conn, session_id, count).await?
        {
            tracing::debug!(session_id, count, remaining, attempt, "Seats reserved");
            return Ok(remaining);
        }

        let available = MovieSessionRepo::available_seats(&mut *conn, session_id)
            .await?
            .ok_or_else(|| AppError::not_found("MovieSession", session_id))?;
        after_missed_update(session_id, available, count, attempt)?;
        tracing::debug!(session_id, count, available, attempt, "Seat count changed, retrying reservation");
        attempt += 1;
    }
}

/// Decide what follows a guarded update that matched no row.
///
/// `Ok` means the re-read shows enough seats (a concurrent release landed in
/// between) and the update should run again; after [`MAX_ATTEMPTS`] updates
/// this becomes `Conflict`.
fn after_missed_update(session_id: DbId, available: i32, count: i32, attempt: u32) -> Result<(), CoreError> {
    check_capacity(session_id, available, count)?;
    if attempt >= MAX_ATTEMPTS {
        return Err(CoreError::Conflict(format!(
            "Seat count of session {session_id} kept changing during reservation"
        )));
    }
    Ok(())
}

/// Return `count` seats previously taken by [`reserve_seats`]. Returns the
/// seats now available.
pub async fn release_seats(conn: &mut PgConnection, session_id: DbId, count: i32) -> AppResult<i32> {
    if count <= 0 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Seat count must be positive, got {count}"
        ))));
    }
    let available = MovieSessionRepo::release_seats(&mut *conn, session_id, count)
        .await?
        .ok_or_else(|| AppError::not_found("MovieSession", session_id))?;
    tracing::debug!(session_id, count, available, "Seats released");
    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn missed_update_with_too_few_seats_is_insufficient_capacity() {
        assert_matches!(
            after_missed_update(7, 1, 2, 1),
            Err(CoreError::InsufficientCapacity { session_id: 7, requested: 2, available: 1 })
        );
    }

    #[test]
    fn missed_update_with_enough_seats_is_retried() {
        assert_matches!(after_missed_update(7, 5, 2, 1), Ok(()));
        assert_matches!(after_missed_update(7, 5, 2, MAX_ATTEMPTS - 1), Ok(()));
    }

    #[test]
    fn missed_update_gives_up_after_bounded_attempts() {
        assert_matches!(
            after_missed_update(7, 5, 2, MAX_ATTEMPTS),
            Err(CoreError::Conflict(_))
        );
    }
}
