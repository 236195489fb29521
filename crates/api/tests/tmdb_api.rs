//! HTTP-level tests for the movie-metadata proxy, against a mock upstream.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use mockito::Matcher;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unconfigured_proxy_returns_503(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/tmdb/popular").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_popular_is_passed_through(pool: PgPool) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/movie/popular")
        .match_header("authorization", "Bearer test-token")
        .match_query(Matcher::UrlEncoded("language".into(), "ru-RU".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 1, "results": [{"id": 949, "title": "Heat"}], "total_pages": 1}"#)
        .create_async()
        .await;
    let app = common::build_test_app_with_tmdb(pool, &server.url());

    let response = get(app, "/api/v1/tmdb/popular?language=ru-RU").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["results"][0]["title"], "Heat");
    assert_eq!(json["total_pages"], 1);
    mock.assert_async().await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upstream_failure_returns_503(pool: PgPool) {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let app = common::build_test_app_with_tmdb(pool, &server.url());

    let response = get(app, "/api/v1/tmdb/popular").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
