//! HTTP-level tests for the film catalog: localization, search, listings
//! and the details page.

mod common;

use axum::body::Body;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, Utc};
use common::{
    at, body_json, create_film, create_hall, create_session, create_user, get, post_json_auth,
    put_json_auth, token_for,
};
use kino_core::pricing::SessionPriceFields;
use kino_core::roles::{ROLE_ADMIN, ROLE_USER};
use kino_core::session::SessionLanguage;
use kino_db::models::movie_session::CreateMovieSession;
use kino_db::repositories::MovieSessionRepo;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn days_from_today(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

fn titles(list: &serde_json::Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|f| f["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Localization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_film_text_follows_requested_language(pool: PgPool) {
    let film = create_film(&pool, "Heat", days_from_today(-20)).await;
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    for (lang, title) in [("ru", "Схватка"), ("en-US", "Heat (1995)")] {
        let uri = format!("/api/v1/films/{}/translations/{lang}", film.id);
        let response = put_json_auth(app.clone(), &uri, json!({ "title": title }), &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let uri = format!("/api/v1/films/{}", film.id);

    let json = body_json(get(app.clone(), &format!("{uri}?lang=ru")).await).await;
    assert_eq!(json["title"], "Схватка");
    assert_eq!(json["language"], "ru");

    let request = Request::builder()
        .uri(&uri)
        .header(ACCEPT_LANGUAGE, "ru-RU,ru;q=0.9,en;q=0.8")
        .body(Body::empty())
        .unwrap();
    let json = body_json(app.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(json["title"], "Схватка");

    // No Kazakh translation: the default language is used.
    let json = body_json(get(app.clone(), &format!("{uri}?lang=kk")).await).await;
    assert_eq!(json["title"], "Heat (1995)");
    assert_eq!(json["language"], "en");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_untranslated_film_uses_base_text(pool: PgPool) {
    let film = create_film(&pool, "Tomiris", days_from_today(-5)).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, &format!("/api/v1/films/{}?lang=ru", film.id)).await).await;

    assert_eq!(json["title"], "Tomiris");
    assert_eq!(json["overview"], "Tomiris overview");
    assert_eq!(json["genres"], json!(["Drama"]));
    assert_eq!(json["vote_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_translation_language_is_rejected(pool: PgPool) {
    let film = create_film(&pool, "Heat", days_from_today(-20)).await;
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/films/{}/translations/klingon", film.id);
    let response = put_json_auth(app, &uri, json!({ "title": "x" }), &token_for(&admin)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_titles_case_insensitively(pool: PgPool) {
    create_film(&pool, "Heat", days_from_today(-20)).await;
    create_film(&pool, "Heathers", days_from_today(-20)).await;
    create_film(&pool, "Up", days_from_today(-20)).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/v1/films/search?query=hEaT").await).await;
    let mut found = titles(&json);
    found.sort();
    assert_eq!(found, vec!["Heat", "Heathers"]);

    let json = body_json(get(app.clone(), "/api/v1/films/search?query=").await).await;
    assert_eq!(json, json!([]));

    let json = body_json(get(app, "/api/v1/films/search").await).await;
    assert_eq!(json, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_translated_titles(pool: PgPool) {
    let film = create_film(&pool, "Vor", days_from_today(-20)).await;
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/films/{}/translations/en", film.id);
    put_json_auth(app.clone(), &uri, json!({ "title": "The Thief" }), &token_for(&admin)).await;

    let json = body_json(get(app, "/api/v1/films/search?query=thief").await).await;
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], film.id);
}

// ---------------------------------------------------------------------------
// Admin writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_creates_film_with_cast(pool: PgPool) {
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let actor = body_json(
        post_json_auth(app.clone(), "/api/v1/actors", json!({ "name": "Al Pacino" }), &token).await,
    )
    .await;

    let body = json!({
        "title": "Heat",
        "release_date": "1995-12-15",
        "runtime": 170,
        "genres": ["Crime", "Drama"],
        "actor_ids": [actor["id"]],
        "vote_average": 9.9,
    });
    let response = post_json_auth(app, "/api/v1/films", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["actors"][0]["name"], "Al Pacino");
    assert_eq!(json["genres"], json!(["Crime", "Drama"]));
    // Aggregates are read-only.
    assert_eq!(json["vote_average"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_film_with_unknown_actor_is_not_created(pool: PgPool) {
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "title": "Ghost",
        "release_date": "2026-01-01",
        "runtime": 90,
        "actor_ids": [777],
    });
    let response = post_json_auth(app.clone(), "/api/v1/films", body, &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get(app, "/api/v1/films").await).await;
    assert_eq!(json, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_regular_user_cannot_create_film(pool: PgPool) {
    let user = create_user(&pool, "viewer", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let body = json!({ "title": "Heat", "release_date": "1995-12-15", "runtime": 170 });
    let response = post_json_auth(app, "/api/v1/films", body, &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_details_groups_week_of_sessions_by_date(pool: PgPool) {
    let film = create_film(&pool, "Heat", days_from_today(-20)).await;
    let hall = create_hall(&pool, 80).await;
    create_session(&pool, film.id, &hall, at(19, 0), 80, SessionPriceFields::default()).await;
    create_session(&pool, film.id, &hall, at(14, 0), 80, SessionPriceFields::default()).await;
    let far = CreateMovieSession {
        film_id: film.id,
        cinema_id: hall.cinema_id,
        hall_id: hall.id,
        date: days_from_today(10),
        time: at(12, 0),
        language: SessionLanguage::Kazakh,
        available_seats: None,
        prices: SessionPriceFields::default(),
    };
    MovieSessionRepo::create(&pool, &far, 80).await.unwrap();
    let app = common::build_test_app(pool);

    let response = get(app, &format!("/api/v1/films/{}/details", film.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["film"]["title"], "Heat");
    assert_eq!(json["dates"]["minimum"], today().to_string());
    assert_eq!(json["dates"]["maximum"], days_from_today(7).to_string());

    let sessions = json["sessions"].as_object().unwrap();
    assert_eq!(sessions.len(), 1);
    let day = sessions[&days_from_today(1).to_string()].as_array().unwrap();
    assert_eq!(day.len(), 2);
    assert_eq!(day[0]["time"], "14:00");
    assert_eq!(day[0]["prices"]["adult"].as_f64(), Some(2000.0));
    assert_eq!(day[1]["time"], "19:00");
    assert_eq!(day[1]["prices"]["adult"].as_f64(), Some(2500.0));
    assert_eq!(day[1]["language"], "English");
    assert_eq!(day[1]["language_code"], "EN");
    assert_eq!(day[1]["cinema"], "Arman");
    assert_eq!(day[1]["hall"], "Hall 1");
    assert_eq!(day[1]["available_seats"], 80);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_popular_skips_old_releases(pool: PgPool) {
    create_film(&pool, "Fresh", days_from_today(-10)).await;
    create_film(&pool, "Soon", days_from_today(30)).await;
    create_film(&pool, "Ancient", NaiveDate::from_ymd_opt(2001, 1, 1).unwrap()).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/films/popular").await).await;

    assert_eq!(json["page"], 1);
    let mut found = titles(&json["results"]);
    found.sort();
    assert_eq!(found, vec!["Fresh", "Soon"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upcoming_lists_future_releases_in_order(pool: PgPool) {
    create_film(&pool, "Later", days_from_today(40)).await;
    create_film(&pool, "Sooner", days_from_today(5)).await;
    create_film(&pool, "Released", days_from_today(-1)).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/films/upcoming").await).await;

    assert_eq!(titles(&json["results"]), vec!["Sooner", "Later"]);
    assert_eq!(json["dates"]["minimum"], today().to_string());
    assert_eq!(json["dates"]["maximum"], days_from_today(90).to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_now_playing_needs_a_session_in_window(pool: PgPool) {
    let showing = create_film(&pool, "Showing", days_from_today(-10)).await;
    create_film(&pool, "Idle", days_from_today(-10)).await;
    let hall = create_hall(&pool, 50).await;
    create_session(&pool, showing.id, &hall, at(18, 30), 50, SessionPriceFields::default()).await;
    create_session(&pool, showing.id, &hall, at(21, 0), 50, SessionPriceFields::default()).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/v1/films/now-playing").await).await;
    assert_eq!(titles(&json["results"]), vec!["Showing"]);

    let json = body_json(get(app, &format!("/api/v1/films/{}/cinemas", showing.id)).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Arman");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_film_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/films/31337",
        "/api/v1/films/31337/details",
        "/api/v1/films/31337/sessions",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
