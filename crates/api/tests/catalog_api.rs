//! HTTP-level tests for actors, cinemas and halls.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get, post_json, post_json_auth, put_json_auth, token_for,
};
use kino_core::roles::{ROLE_ADMIN, ROLE_USER};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_actor_crud_round_trip(pool: PgPool) {
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/actors",
        json!({ "name": "Asanali Ashimov", "bio": "Soviet Kazakh actor" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let actor = body_json(response).await;
    let uri = format!("/api/v1/actors/{}", actor["id"]);

    let response = put_json_auth(app.clone(), &uri, json!({ "photo_url": "https://img/a.jpg" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["photo_url"], "https://img/a.jpg");
    assert_eq!(json["name"], "Asanali Ashimov");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_writes_require_admin(pool: PgPool) {
    let user = create_user(&pool, "viewer", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let response = post_json(app.clone(), "/api/v1/cinemas", json!({ "name": "X", "address": "Y" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(
        app,
        "/api/v1/actors",
        json!({ "name": "Nobody" }),
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cinema_with_halls(pool: PgPool) {
    let admin = create_user(&pool, "boss", ROLE_ADMIN).await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let cinema = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/cinemas",
            json!({ "name": "Kinopark 8", "address": "Abay 44", "contact_number": "+7727" }),
            &token,
        )
        .await,
    )
    .await;
    let halls_uri = format!("/api/v1/cinemas/{}/halls", cinema["id"]);

    let response = post_json_auth(app.clone(), &halls_uri, json!({ "name": "IMAX", "capacity": 300 }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let hall = body_json(response).await;
    assert_eq!(hall["cinema_id"], cinema["id"]);

    // Hall names are unique per cinema.
    let response = post_json_auth(app.clone(), &halls_uri, json!({ "name": "IMAX", "capacity": 10 }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(app.clone(), &halls_uri, json!({ "name": "Tiny", "capacity": 0 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get(app.clone(), &halls_uri).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = delete_auth(app.clone(), &format!("{halls_uri}/{}", hall["id"]), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, &halls_uri).await).await;
    assert_eq!(json, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_halls_of_missing_cinema_return_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/cinemas/5555/halls").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
