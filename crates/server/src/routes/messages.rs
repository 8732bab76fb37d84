use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use models::message::{InsertMessage, Message};

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: i64,
}

/// All messages the user sent or received, chronological.
#[utoipa::path(get, path = "/api/messages", tag = "messages",
    params(("user_id" = i64, Query, description = "Sender or recipient")),
    responses((status = 200, description = "Messages involving the user")))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Message>> {
    Json(state.storage.messages_for(query.user_id).await)
}

/// Messages exchanged between exactly these two users; symmetric in the
/// path arguments.
#[utoipa::path(get, path = "/api/conversations/{user_a}/{user_b}", tag = "messages",
    params(
        ("user_a" = i64, Path, description = "One participant"),
        ("user_b" = i64, Path, description = "The other participant"),
    ),
    responses((status = 200, description = "Conversation, chronological")))]
pub async fn conversation(
    State(state): State<AppState>,
    Path((user_a, user_b)): Path<(i64, i64)>,
) -> Json<Vec<Message>> {
    Json(state.storage.conversation(user_a, user_b).await)
}

#[utoipa::path(post, path = "/api/messages", tag = "messages",
    request_body = crate::openapi::InsertMessageDoc,
    responses((status = 200, description = "Created, unread"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<InsertMessage>,
) -> Result<Json<Message>, ApiError> {
    state.storage.create_message(input).await.map(Json).map_err(ApiError::from)
}

/// Set the read flag. Unknown ids are a silent no-op, so this always 204s.
#[utoipa::path(post, path = "/api/messages/{id}/read", tag = "messages",
    params(("id" = i64, Path, description = "Message id")),
    responses((status = 204, description = "Marked read (or no such message)")))]
pub async fn mark_read(State(state): State<AppState>, Path(id): Path<i64>) -> StatusCode {
    state.storage.mark_message_read(id).await;
    StatusCode::NO_CONTENT
}
