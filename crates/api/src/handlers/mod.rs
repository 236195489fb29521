pub mod actor;
pub mod auth;
pub mod booking;
pub mod cinema;
pub mod film;
pub mod session;
pub mod tmdb;
pub mod user;
pub mod vote;
