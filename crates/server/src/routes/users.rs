use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use models::user::{InsertUser, UpsertUser, User};

use crate::errors::ApiError;
use crate::routes::AppState;

/// List all users, order unspecified.
#[utoipa::path(get, path = "/api/users", tag = "users", responses((status = 200, description = "All users")))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.storage.all_users().await)
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "User"), (status = 404, description = "Unknown id")))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, StatusCode> {
    match state.storage.get_user(id).await {
        Some(user) => Ok(Json(user)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[utoipa::path(post, path = "/api/users", tag = "users",
    request_body = crate::openapi::InsertUserDoc,
    responses((status = 200, description = "Created"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<InsertUser>,
) -> Result<Json<User>, ApiError> {
    state.storage.create_user(input).await.map(Json).map_err(ApiError::from)
}

/// Upsert keyed by email; used by external-identity-driven account creation.
#[utoipa::path(put, path = "/api/users", tag = "users",
    request_body = crate::openapi::UpsertUserDoc,
    responses((status = 200, description = "Created or updated"), (status = 400, description = "Validation failed")))]
pub async fn upsert(
    State(state): State<AppState>,
    Json(input): Json<UpsertUser>,
) -> Result<Json<User>, ApiError> {
    state.storage.upsert_user(input).await.map(Json).map_err(ApiError::from)
}
