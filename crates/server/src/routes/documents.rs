use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use models::document::{Document, InsertDocument};

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: i64,
}

#[utoipa::path(get, path = "/api/documents", tag = "documents",
    params(("user_id" = i64, Query, description = "Owning user")),
    responses((status = 200, description = "Documents owned by the user")))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Document>> {
    Json(state.storage.documents_for(query.user_id).await)
}

#[utoipa::path(post, path = "/api/documents", tag = "documents",
    request_body = crate::openapi::InsertDocumentDoc,
    responses((status = 200, description = "Created"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<InsertDocument>,
) -> Result<Json<Document>, ApiError> {
    state.storage.create_document(input).await.map(Json).map_err(ApiError::from)
}
