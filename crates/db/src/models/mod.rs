//! Row models and DTOs, one module per table.

pub mod actor;
pub mod booking;
pub mod cinema;
pub mod film;
pub mod movie_session;
pub mod refresh_token;
pub mod user;
pub mod vote;
