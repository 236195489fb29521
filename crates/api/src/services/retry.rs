//! Bounded retry for transactions that lose a concurrency race.

use std::future::Future;

use kino_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// Total attempts, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

/// PostgreSQL `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// PostgreSQL `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";

/// Whether an error means the transaction was rolled back by a concurrent one
/// and can be replayed as-is.
pub fn is_retryable(err: &AppError) -> bool {
    match err {
        AppError::Database(sqlx::Error::Database(db_err)) => matches!(
            db_err.code().as_deref(),
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
        ),
        _ => false,
    }
}

/// Run `attempt` until it succeeds, fails with a non-retryable error, or
/// [`MAX_ATTEMPTS`] is reached. Exhaustion surfaces as [`CoreError::Conflict`].
///
/// Each call to `attempt` must open its own transaction.
pub async fn with_retry<T, F, Fut>(operation: &'static str, mut attempt: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(err) if is_retryable(&err) => {
                if tries >= MAX_ATTEMPTS {
                    tracing::warn!(operation, tries, error = %err, "Giving up after concurrent update conflicts");
                    return Err(AppError::Core(CoreError::Conflict(format!(
                        "{operation} conflicted with a concurrent update; please retry"
                    ))));
                }
                tracing::debug!(operation, tries, error = %err, "Retrying transaction");
                tries += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::Cell;

    #[tokio::test]
    async fn success_is_returned_immediately() {
        let calls = Cell::new(0);
        let result = with_retry("test", || {
            calls.set(calls.get() + 1);
            async { Ok::<_, AppError>(5) }
        })
        .await;
        assert_eq!(result.unwrap(), 5);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn domain_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: AppResult<()> = with_retry("test", || {
            calls.set(calls.get() + 1);
            async { Err(AppError::Core(CoreError::Validation("bad".into()))) }
        })
        .await;
        assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn non_database_errors_are_not_retryable() {
        assert!(!is_retryable(&AppError::Database(sqlx::Error::RowNotFound)));
        assert!(!is_retryable(&AppError::BadRequest("x".into())));
    }
}
