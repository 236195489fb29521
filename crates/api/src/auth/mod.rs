//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and the registration password policy.
//! - [`jwt`] -- HS256 access tokens and opaque refresh tokens.

pub mod jwt;
pub mod password;
