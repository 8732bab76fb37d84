use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use service::calls::{CallStatus, JoinDetails};

use crate::routes::AppState;

/// Join the video call for an appointment. Idempotent: repeated joins return
/// the same room instead of constructing a second widget session.
#[utoipa::path(post, path = "/api/appointments/{id}/call/join", tag = "calls",
    params(("id" = i64, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Room name and widget options"),
        (status = 404, description = "Unknown appointment"),
    ))]
pub async fn join(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JoinDetails>, StatusCode> {
    if state.storage.get_appointment(id).await.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(state.calls.join(id).await))
}

#[utoipa::path(get, path = "/api/appointments/{id}/call", tag = "calls",
    params(("id" = i64, Path, description = "Appointment id")),
    responses((status = 200, description = "Room, elapsed time and notes"), (status = 404, description = "No live call")))]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CallStatus>, StatusCode> {
    match state.calls.status(id).await {
        Some(status) => Ok(Json(status)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[derive(Debug, Deserialize)]
pub struct NotesBody {
    pub notes: String,
}

#[utoipa::path(put, path = "/api/appointments/{id}/call/notes", tag = "calls",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body = crate::openapi::NotesDoc,
    responses((status = 204, description = "Notes replaced"), (status = 404, description = "No live call")))]
pub async fn set_notes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NotesBody>,
) -> StatusCode {
    if state.calls.set_notes(id, body.notes).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// End the call and dispose the session.
#[utoipa::path(delete, path = "/api/appointments/{id}/call", tag = "calls",
    params(("id" = i64, Path, description = "Appointment id")),
    responses((status = 204, description = "Call ended"), (status = 404, description = "No live call")))]
pub async fn end(State(state): State<AppState>, Path(id): Path<i64>) -> StatusCode {
    if state.calls.end(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
