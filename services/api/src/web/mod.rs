pub mod chat;
pub mod materials;
pub mod protocol;
pub mod rest;
pub mod state;

// Both binaries need the OpenAPI document: the server mounts it under
// Swagger UI, the `openapi` binary dumps it to disk.
pub use rest::ApiDoc;

use axum::http::StatusCode;
use axum::{
    routing::{get, post, put},
    Router,
};
use state::{AppState, SessionHandle};
use std::sync::Arc;
use study_assistant_core::ports::PortError;
use uuid::Uuid;

/// Builds the application router. Shared between the `api` binary and the
/// integration tests, so both exercise the same routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(rest::create_session_handler))
        .route("/sessions/{id}", get(rest::get_session_handler))
        .route(
            "/sessions/{id}/notes",
            put(rest::update_notes_handler).delete(rest::clear_notes_handler),
        )
        .route("/sessions/{id}/notes/upload", post(rest::upload_notes_handler))
        .route(
            "/sessions/{id}/materials/{material}",
            post(materials::generate_material_handler),
        )
        .route(
            "/sessions/{id}/flashcards/cursor",
            post(materials::advance_cursor_handler),
        )
        .route("/sessions/{id}/answers", post(materials::select_answer_handler))
        .route(
            "/sessions/{id}/answers/submit",
            post(materials::submit_answers_handler),
        )
        .route(
            "/sessions/{id}/answers/reset",
            post(materials::reset_answers_handler),
        )
        .route("/sessions/{id}/mock-test/page", post(materials::turn_page_handler))
        .route("/sessions/{id}/chat", post(chat::chat_handler))
        .route("/sessions/{id}/export/{material}", get(rest::export_handler))
        .with_state(app_state)
}

/// Fetches a session handle, mapping a miss onto a 404.
pub(crate) async fn load_session(
    app_state: &AppState,
    id: Uuid,
) -> Result<SessionHandle, (StatusCode, String)> {
    app_state.sessions.get(id).await.map_err(|e| match e {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Unknown {what}")),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    })
}
