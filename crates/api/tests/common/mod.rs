//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{NaiveDate, NaiveTime, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use kino_api::auth::jwt::{generate_access_token, JwtConfig};
use kino_api::auth::password::hash_password;
use kino_api::config::ServerConfig;
use kino_api::router::build_app_router;
use kino_api::state::AppState;
use kino_core::language::LanguageCode;
use kino_core::pricing::SessionPriceFields;
use kino_core::session::SessionLanguage;
use kino_core::types::DbId;
use kino_db::models::cinema::{CreateCinema, CreateHall, Hall};
use kino_db::models::film::{CreateFilm, Film};
use kino_db::models::movie_session::{CreateMovieSession, MovieSession};
use kino_db::models::user::{CreateUser, User};
use kino_db::repositories::{CinemaRepo, FilmRepo, HallRepo, MovieSessionRepo, UserRepo};
use kino_tmdb::TmdbClient;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults and no metadata service.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8081".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        default_language: LanguageCode::default(),
        jwt: JwtConfig {
            secret: "test-secret-do-not-use-in-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        tmdb: None,
    }
}

/// Full application router over `pool`, same middleware stack as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, None)
}

/// Like [`build_test_app`] but with the metadata proxy pointed at `base_url`.
pub fn build_test_app_with_tmdb(pool: PgPool, base_url: &str) -> Router {
    let client = TmdbClient::new(base_url, "test-token").unwrap();
    build_app_with(pool, Some(client))
}

fn build_app_with(pool: PgPool, tmdb: Option<TmdbClient>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        tmdb,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly in the database.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

/// Access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Catalog fixtures
// ---------------------------------------------------------------------------

pub async fn create_film(pool: &PgPool, title: &str, release_date: NaiveDate) -> Film {
    let mut conn = pool.acquire().await.unwrap();
    FilmRepo::create(
        &mut *conn,
        &CreateFilm {
            title: title.to_string(),
            overview: Some(format!("{title} overview")),
            tagline: None,
            release_date,
            runtime: 120,
            poster_url: None,
            background_url: None,
            genres: vec!["Drama".to_string()],
            actor_ids: Vec::new(),
        },
    )
    .await
    .unwrap()
}

/// A cinema with one hall of `capacity` seats.
pub async fn create_hall(pool: &PgPool, capacity: i32) -> Hall {
    let cinema = CinemaRepo::create(
        pool,
        &CreateCinema {
            name: "Arman".to_string(),
            address: "Dostyk 1".to_string(),
            contact_number: None,
        },
    )
    .await
    .unwrap();
    HallRepo::create(
        pool,
        cinema.id,
        &CreateHall {
            name: "Hall 1".to_string(),
            capacity,
        },
    )
    .await
    .unwrap()
}

/// Schedule `film_id` in `hall` tomorrow at `time` with `seats` available.
pub async fn create_session(
    pool: &PgPool,
    film_id: DbId,
    hall: &Hall,
    time: NaiveTime,
    seats: i32,
    prices: SessionPriceFields,
) -> MovieSession {
    let input = CreateMovieSession {
        film_id,
        cinema_id: hall.cinema_id,
        hall_id: hall.id,
        date: tomorrow(),
        time,
        language: SessionLanguage::English,
        available_seats: Some(seats),
        prices,
    };
    MovieSessionRepo::create(pool, &input, seats).await.unwrap()
}

pub fn tomorrow() -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(1)
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
