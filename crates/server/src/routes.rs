use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::calls::CallSessionManager;
use service::storage::Storage;

use crate::openapi::ApiDoc;

pub mod appointments;
pub mod calls;
pub mod documents;
pub mod messages;
pub mod users;

/// Request context constructed once at startup and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub calls: Arc<CallSessionManager>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, API routes, docs and layers.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/users", get(users::list).post(users::create).put(users::upsert))
        .route("/api/users/:id", get(users::get_by_id))
        .route(
            "/api/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route("/api/appointments/:id", get(appointments::get_by_id))
        .route("/api/appointments/:id/status", patch(appointments::update_status))
        .route("/api/appointments/:id/call/join", post(calls::join))
        .route("/api/appointments/:id/call", get(calls::status).delete(calls::end))
        .route("/api/appointments/:id/call/notes", put(calls::set_notes))
        .route("/api/messages", get(messages::list).post(messages::create))
        .route("/api/messages/:id/read", post(messages::mark_read))
        .route("/api/conversations/:user_a/:user_b", get(messages::conversation))
        .route("/api/documents", get(documents::list).post(documents::create));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
