//! HTTP-level tests for `/films/{id}/vote` and the film rating aggregate.

mod common;

use axum::http::StatusCode;
use axum::Router;
use chrono::NaiveDate;
use common::{
    body_json, create_film, create_user, delete_auth, get, get_auth, post_json_auth, token_for,
};
use kino_core::roles::{ROLE_ADMIN, ROLE_USER};
use kino_core::types::DbId;
use serde_json::json;
use sqlx::PgPool;

async fn film_rating(app: Router, film_id: DbId) -> (f64, i64) {
    let json = body_json(get(app, &format!("/api/v1/films/{film_id}")).await).await;
    (
        json["vote_average"].as_f64().unwrap(),
        json["vote_count"].as_i64().unwrap(),
    )
}

fn release() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_voting_twice_replaces_the_vote(pool: PgPool) {
    let film = create_film(&pool, "Kairat", release()).await;
    let user = create_user(&pool, "critic", ROLE_USER).await;
    let token = token_for(&user);
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/films/{}/vote", film.id);

    let response = post_json_auth(app.clone(), &uri, json!({ "rating": 6 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app.clone(), &uri, json!({ "rating": 9.5 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["rating"], 9.5);
    assert_eq!(json["vote_average"], 9.5);
    assert_eq!(json["vote_count"], 1);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE film_id = $1")
        .bind(film.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let own = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(own["rating"], 9.5);
    assert_eq!(film_rating(app, film.id).await, (9.5, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_average_is_rounded_to_one_decimal(pool: PgPool) {
    let film = create_film(&pool, "Kairat", release()).await;
    let mut users = Vec::new();
    for name in ["a", "b", "c"] {
        users.push(create_user(&pool, name, ROLE_USER).await);
    }
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/films/{}/vote", film.id);

    for (user, rating) in users.iter().zip([8.0, 9.0, 9.0]) {
        let response =
            post_json_auth(app.clone(), &uri, json!({ "rating": rating }), &token_for(user)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(film_rating(app, film.id).await, (8.7, 3));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_midpoint_average_rounds_half_to_even(pool: PgPool) {
    let film = create_film(&pool, "Kairat", release()).await;
    let first = create_user(&pool, "first", ROLE_USER).await;
    let second = create_user(&pool, "second", ROLE_USER).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/films/{}/vote", film.id);

    post_json_auth(app.clone(), &uri, json!({ "rating": 8.0 }), &token_for(&first)).await;
    let response = post_json_auth(app.clone(), &uri, json!({ "rating": 8.5 }), &token_for(&second)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["vote_average"], 8.2);

    assert_eq!(film_rating(app, film.id).await, (8.2, 2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removing_vote_recomputes_aggregate(pool: PgPool) {
    let film = create_film(&pool, "Kairat", release()).await;
    let keeper = create_user(&pool, "keeper", ROLE_USER).await;
    let quitter = create_user(&pool, "quitter", ROLE_USER).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/films/{}/vote", film.id);

    post_json_auth(app.clone(), &uri, json!({ "rating": 4 }), &token_for(&keeper)).await;
    post_json_auth(app.clone(), &uri, json!({ "rating": 10 }), &token_for(&quitter)).await;
    assert_eq!(film_rating(app.clone(), film.id).await, (7.0, 2));

    let response = delete_auth(app.clone(), &uri, &token_for(&quitter)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["vote_average"], 4.0);
    assert_eq!(json["vote_count"], 1);

    let response = get_auth(app.clone(), &uri, &token_for(&quitter)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(film_rating(app, film.id).await, (4.0, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removing_missing_vote_leaves_aggregate_alone(pool: PgPool) {
    let film = create_film(&pool, "Kairat", release()).await;
    let voter = create_user(&pool, "voter", ROLE_USER).await;
    let stranger = create_user(&pool, "stranger", ROLE_USER).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/films/{}/vote", film.id);

    post_json_auth(app.clone(), &uri, json!({ "rating": 7 }), &token_for(&voter)).await;

    let response = delete_auth(app.clone(), &uri, &token_for(&stranger)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(film_rating(app, film.id).await, (7.0, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_rating_is_rejected(pool: PgPool) {
    let film = create_film(&pool, "Kairat", release()).await;
    let user = create_user(&pool, "critic", ROLE_USER).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/films/{}/vote", film.id);

    for rating in [json!(-1), json!(10.5)] {
        let response =
            post_json_auth(app.clone(), &uri, json!({ "rating": rating }), &token_for(&user)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(film_rating(app, film.id).await, (0.0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_vote_on_missing_film_returns_404(pool: PgPool) {
    let user = create_user(&pool, "critic", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/films/424242/vote",
        json!({ "rating": 5 }),
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_voter_rescores_film(pool: PgPool) {
    let film = create_film(&pool, "Kairat", release()).await;
    let stays = create_user(&pool, "stays", ROLE_USER).await;
    let goes = create_user(&pool, "goes", ROLE_USER).await;
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/films/{}/vote", film.id);

    post_json_auth(app.clone(), &uri, json!({ "rating": 6 }), &token_for(&stays)).await;
    post_json_auth(app.clone(), &uri, json!({ "rating": 2 }), &token_for(&goes)).await;
    assert_eq!(film_rating(app.clone(), film.id).await, (4.0, 2));

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", goes.id),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(film_rating(app, film.id).await, (6.0, 1));
}
