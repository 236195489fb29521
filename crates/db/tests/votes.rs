//! Integration tests for vote storage and the derived film rating columns.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use kino_core::rating::{aggregate, VoteAggregate};
use kino_db::models::film::CreateFilm;
use kino_db::models::user::CreateUser;
use kino_db::repositories::{FilmRepo, UserRepo, VoteRepo};
use sqlx::PgPool;

async fn seed_film(pool: &PgPool) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    FilmRepo::create(
        &mut *conn,
        &CreateFilm {
            title: "Solaris".to_string(),
            overview: Some("A psychologist is sent to a space station.".to_string()),
            tagline: None,
            release_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            runtime: 167,
            poster_url: None,
            background_url: None,
            genres: vec![],
            actor_ids: vec![],
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeat_vote_updates_in_place(pool: PgPool) {
    let film_id = seed_film(&pool).await;
    let user_id = seed_user(&pool, "carol").await;
    let mut tx = pool.begin().await.unwrap();

    let first = VoteRepo::upsert(&mut *tx, user_id, film_id, 4.0).await.unwrap();
    let second = VoteRepo::upsert(&mut *tx, user_id, film_id, 9.0).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.rating, 9.0);

    let ratings = VoteRepo::ratings_for_film(&mut *tx, film_id).await.unwrap();
    assert_eq!(ratings, vec![9.0]);
    tx.commit().await.unwrap();

    let stored = VoteRepo::find(&pool, user_id, film_id).await.unwrap().unwrap();
    assert_eq!(stored.rating, 9.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_aggregate_written_with_votes(pool: PgPool) {
    let film_id = seed_film(&pool).await;
    let mut tx = pool.begin().await.unwrap();

    FilmRepo::lock_for_update(&mut *tx, film_id).await.unwrap().unwrap();
    for (name, rating) in [("a", 7.0), ("b", 8.0), ("c", 8.0)] {
        let user_id = seed_user(&pool, name).await;
        VoteRepo::upsert(&mut *tx, user_id, film_id, rating).await.unwrap();
    }
    let ratings = VoteRepo::ratings_for_film(&mut *tx, film_id).await.unwrap();
    let agg = aggregate(&ratings);
    FilmRepo::set_vote_aggregate(&mut *tx, film_id, &agg).await.unwrap();
    tx.commit().await.unwrap();

    let film = FilmRepo::find_by_id(&pool, film_id).await.unwrap().unwrap();
    assert_eq!(film.vote_count, 3);
    assert_eq!(film.vote_average, 7.7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_vote_reports_false(pool: PgPool) {
    let film_id = seed_film(&pool).await;
    let user_id = seed_user(&pool, "dave").await;
    let mut conn = pool.acquire().await.unwrap();

    assert!(!VoteRepo::delete(&mut *conn, user_id, film_id).await.unwrap());
    VoteRepo::upsert(&mut *conn, user_id, film_id, 5.0).await.unwrap();
    assert!(VoteRepo::delete(&mut *conn, user_id, film_id).await.unwrap());
    assert!(VoteRepo::ratings_for_film(&mut *conn, film_id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_rating_rejected_by_schema(pool: PgPool) {
    let film_id = seed_film(&pool).await;
    let user_id = seed_user(&pool, "erin").await;
    let mut conn = pool.acquire().await.unwrap();

    let result = VoteRepo::upsert(&mut *conn, user_id, film_id, 10.5).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_delete_cascades_votes(pool: PgPool) {
    let film_id = seed_film(&pool).await;
    let user_id = seed_user(&pool, "frank").await;
    let mut tx = pool.begin().await.unwrap();

    VoteRepo::upsert(&mut *tx, user_id, film_id, 6.0).await.unwrap();
    assert_eq!(
        VoteRepo::film_ids_for_user(&mut *tx, user_id).await.unwrap(),
        vec![film_id]
    );
    assert!(UserRepo::delete(&mut *tx, user_id).await.unwrap());
    assert!(VoteRepo::ratings_for_film(&mut *tx, film_id)
        .await
        .unwrap()
        .is_empty());
    FilmRepo::set_vote_aggregate(&mut *tx, film_id, &VoteAggregate::EMPTY)
        .await
        .unwrap();
    tx.commit().await.unwrap();
}
