use sqlx::PgPool;

/// Connect, migrate, and verify every table is in place.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    kino_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "refresh_tokens",
        "actors",
        "cinemas",
        "halls",
        "films",
        "film_actors",
        "film_translations",
        "votes",
        "movie_sessions",
        "bookings",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Unique constraints follow the `uq_` naming convention the API maps to 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints_are_named(pool: PgPool) {
    let names: Vec<(String,)> = sqlx::query_as(
        "SELECT conname::TEXT FROM pg_constraint
         WHERE contype = 'u' AND connamespace = 'public'::regnamespace
         ORDER BY conname",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!names.is_empty());
    for (name,) in &names {
        assert!(name.starts_with("uq_"), "constraint {name} should start with uq_");
    }
    assert!(names.iter().any(|(n,)| n == "uq_votes_user_film"));
}

/// The seat counter cannot be driven below zero even by a direct write.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_available_seats_check_constraint(pool: PgPool) {
    let def: (String,) = sqlx::query_as(
        "SELECT pg_get_constraintdef(oid) FROM pg_constraint
         WHERE conname = 'ck_movie_sessions_available_seats'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(def.0.contains("available_seats >= 0"), "got {}", def.0);
}
