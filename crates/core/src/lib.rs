//! Domain logic for the cinema booking backend.
//!
//! Everything here is pure: no database, no HTTP. The `kino-db` and
//! `kino-api` crates feed data in and persist what comes out.

pub mod booking;
pub mod catalog;
pub mod error;
pub mod language;
pub mod pricing;
pub mod rating;
pub mod roles;
pub mod session;
pub mod types;
