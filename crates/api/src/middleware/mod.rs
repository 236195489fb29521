//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`language::RequestLanguage`] -- the language film text is rendered in.

pub mod auth;
pub mod language;
pub mod rbac;
