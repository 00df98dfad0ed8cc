//! services/api/src/web/chat.rs
//!
//! Handler for the tutor chat. One request appends the student turn, asks
//! the tutor agent, and appends the reply; a failed agent call appends a
//! fixed apology instead, so the transcript never loses the student's turn.

use crate::web::protocol::{ChatMessageDto, ChatRequest, ChatResponse};
use crate::web::{load_session, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use study_assistant_core::domain::Role;
use study_assistant_core::fallback::TUTOR_APOLOGY;
use tracing::warn;
use uuid::Uuid;

/// Send one question to the tutor and receive its reply.
#[utoipa::path(
    post,
    path = "/sessions/{id}/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Tutor reply (an apology when the tutor is unreachable)", body = ChatResponse),
        (status = 400, description = "Empty message"),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Chat message must not be empty".to_string(),
        ));
    }

    let handle = load_session(&app_state, id).await?;

    // Record the student turn and snapshot the notes, then release the lock
    // for the upstream call.
    let notes = {
        let mut session = handle.lock().await;
        session.push_chat(Role::User, &message);
        session.notes.clone()
    };

    let reply_text = match app_state.tutor_adapter.reply(&notes, &message).await {
        Ok(text) => text,
        Err(e) => {
            warn!(session_id = %id, error = %e, "Tutor call failed; sending apology");
            TUTOR_APOLOGY.to_string()
        }
    };

    let mut session = handle.lock().await;
    let reply = session.push_chat(Role::Assistant, reply_text);
    let transcript_len = session.transcript.len();
    Ok(Json(ChatResponse {
        reply: ChatMessageDto::from(&reply),
        transcript_len,
    }))
}
