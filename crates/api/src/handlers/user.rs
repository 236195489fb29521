//! Handlers for the caller's profile and admin user management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kino_core::types::DbId;
use kino_db::models::user::{UpdateProfile, UserResponse};
use kino_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.user_id))?;
    Ok(Json(row.into()))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::update_profile(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.user_id))?;
    Ok(Json(row.into()))
}

/// GET /api/v1/admin/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Releases the user's held seats and rescores the films they voted on.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::users::delete_user(&state.pool, id).await?;
    tracing::info!(admin_id = admin.user_id, user_id = id, "Admin deleted user");
    Ok(StatusCode::NO_CONTENT)
}
