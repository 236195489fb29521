//! Transactional operations that span several repositories.
//!
//! Handlers stay thin; every multi-step write that must be atomic lives
//! here and runs inside one database transaction.
//!
//! - [`seat_inventory`] -- the only writer of `movie_sessions.available_seats`.
//! - [`booking`] -- booking creation, confirmation and cancellation.
//! - [`rating`] -- vote upsert/removal and film aggregate recomputation.
//! - [`users`] -- account removal with seat and rating cleanup.
//! - [`retry`] -- bounded retry on serialization failures and deadlocks.

pub mod booking;
pub mod rating;
pub mod retry;
pub mod seat_inventory;
pub mod users;
