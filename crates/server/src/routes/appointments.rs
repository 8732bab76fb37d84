use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use models::appointment::{Appointment, AppointmentStatus, InsertAppointment};
use models::user::UserRole;

use crate::errors::ApiError;
use crate::routes::AppState;

/// Tab selector of the appointment list: "past" means completed consultations,
/// cancelled ones appear in neither tab.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListView {
    Upcoming,
    Past,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: i64,
    pub role: UserRole,
    pub view: Option<ListView>,
}

#[utoipa::path(get, path = "/api/appointments", tag = "appointments",
    params(
        ("user_id" = i64, Query, description = "Participating user"),
        ("role" = String, Query, description = "doctor or patient"),
        ("view" = Option<String>, Query, description = "upcoming or past"),
    ),
    responses((status = 200, description = "Appointments for the user in the given role")))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Appointment>> {
    let mut found = state.storage.appointments_for(query.user_id, query.role).await;
    match query.view {
        Some(ListView::Upcoming) => found.retain(|a| a.status == AppointmentStatus::Upcoming),
        Some(ListView::Past) => found.retain(|a| a.status == AppointmentStatus::Completed),
        None => {}
    }
    Json(found)
}

#[utoipa::path(get, path = "/api/appointments/{id}", tag = "appointments",
    params(("id" = i64, Path, description = "Appointment id")),
    responses((status = 200, description = "Appointment"), (status = 404, description = "Unknown id")))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, StatusCode> {
    match state.storage.get_appointment(id).await {
        Some(appointment) => Ok(Json(appointment)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[utoipa::path(post, path = "/api/appointments", tag = "appointments",
    request_body = crate::openapi::InsertAppointmentDoc,
    responses((status = 200, description = "Created with status upcoming"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<InsertAppointment>,
) -> Result<Json<Appointment>, ApiError> {
    state.storage.create_appointment(input).await.map(Json).map_err(ApiError::from)
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

#[utoipa::path(patch, path = "/api/appointments/{id}/status", tag = "appointments",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body = crate::openapi::StatusUpdateDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Invalid lifecycle transition"),
        (status = 404, description = "Unknown id"),
    ))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Appointment>, ApiError> {
    match state.storage.update_appointment_status(id, body.status).await? {
        Some(appointment) => Ok(Json(appointment)),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("appointment not found".into()))),
    }
}
