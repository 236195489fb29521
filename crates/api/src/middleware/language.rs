//! Language negotiation for localized film text.

use axum::extract::{FromRequestParts, Query};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use kino_core::language::LanguageCode;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LangParam {
    lang: Option<String>,
}

/// Language requested by the caller.
///
/// Resolution order: `?lang=`, then the best `Accept-Language` entry, then
/// the configured default. Unparseable values fall through to the next step.
#[derive(Debug, Clone)]
pub struct RequestLanguage(pub LanguageCode);

impl FromRequestParts<AppState> for RequestLanguage {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let from_query = Query::<LangParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.lang)
            .and_then(|l| LanguageCode::parse(&l));

        let language = from_query
            .or_else(|| {
                parts
                    .headers
                    .get(ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(LanguageCode::from_accept_language)
            })
            .unwrap_or_else(|| state.config.default_language.clone());

        Ok(RequestLanguage(language))
    }
}
