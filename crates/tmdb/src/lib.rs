//! Client for the external movie-metadata service (TMDB v3).
//!
//! Only the popular-films listing is proxied. Responses are passed through
//! as raw JSON so the upstream schema does not leak into our types.

use std::time::Duration;

use serde::Serialize;

/// Language sent upstream when the caller does not choose one.
pub const DEFAULT_LANGUAGE: &str = "kz-KZ";

/// Default public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the metadata service client.
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("TMDB API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// HTTP client bound to one API token.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct LanguageQuery<'a> {
    language: &'a str,
}

impl TmdbClient {
    /// Create a client for `base_url` (e.g. [`DEFAULT_BASE_URL`]) authenticating
    /// with a v4 read access `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, TmdbError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url, token))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Fetch `GET /movie/popular` in the given language.
    pub async fn popular(&self, language: Option<&str>) -> Result<serde_json::Value, TmdbError> {
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        tracing::debug!(language, "Fetching popular films from TMDB");

        let response = self
            .client
            .get(format!("{}/movie/popular", self.base_url))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&LanguageQuery { language })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "TMDB request failed");
            return Err(TmdbError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
