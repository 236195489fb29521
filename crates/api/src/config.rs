use kino_core::language::{LanguageCode, DEFAULT_LANGUAGE};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Language used for film text when a request names none.
    pub default_language: LanguageCode,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// External movie-metadata service; `None` disables the proxy.
    pub tmdb: Option<TmdbConfig>,
}

/// Credentials for the external movie-metadata service.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_token: String,
    pub base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                         |
    /// |------------------------|---------------------------------|
    /// | `HOST`                 | `0.0.0.0`                       |
    /// | `PORT`                 | `3000`                          |
    /// | `CORS_ORIGINS`         | `http://localhost:8081`         |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                            |
    /// | `DB_MAX_CONNECTIONS`   | `20`                            |
    /// | `DEFAULT_LANGUAGE`     | `en`                            |
    /// | `TMDB_API_TOKEN`       | unset (proxy disabled)          |
    /// | `TMDB_BASE_URL`        | `https://api.themoviedb.org/3`  |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8081".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| kino_db::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let default_language = std::env::var("DEFAULT_LANGUAGE")
            .unwrap_or_else(|_| DEFAULT_LANGUAGE.into());
        let default_language = LanguageCode::parse(&default_language)
            .unwrap_or_else(|| panic!("DEFAULT_LANGUAGE '{default_language}' is not a language code"));

        let tmdb = std::env::var("TMDB_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|api_token| TmdbConfig {
                api_token,
                base_url: std::env::var("TMDB_BASE_URL")
                    .unwrap_or_else(|_| kino_tmdb::DEFAULT_BASE_URL.into()),
            });

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_max_connections,
            default_language,
            jwt,
            tmdb,
        }
    }
}
