//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for session lifecycle, notes, and export, plus
//! the master definition for the OpenAPI specification.

use crate::web::protocol::{
    AnswerProgressResponse, AnswerResultDto, AnswerSelection, ChatMessageDto, ChatRequest,
    ChatResponse, CreateSessionResponse, CursorRequest, CursorResponse, DirectionDto,
    FlashcardDto, GenerateResponse, MaterialKind, MaterialRecords, MaterialSource, McqDto,
    MockTestQuestionDto, NotesResponse, PageRequest, PageResponse, SelectAnswerRequest,
    SessionSnapshot, SubmitResponse, UpdateNotesRequest,
};
use crate::web::{load_session, state::AppState};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use study_assistant_core::domain::MaterialSet;
use study_assistant_core::{export, session::StudySession};
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI document
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_session_handler,
        get_session_handler,
        update_notes_handler,
        upload_notes_handler,
        clear_notes_handler,
        export_handler,
        crate::web::materials::generate_material_handler,
        crate::web::materials::advance_cursor_handler,
        crate::web::materials::select_answer_handler,
        crate::web::materials::submit_answers_handler,
        crate::web::materials::reset_answers_handler,
        crate::web::materials::turn_page_handler,
        crate::web::chat::chat_handler,
    ),
    components(
        schemas(
            CreateSessionResponse,
            SessionSnapshot,
            NotesResponse,
            UpdateNotesRequest,
            MaterialKind,
            MaterialSource,
            MaterialRecords,
            FlashcardDto,
            McqDto,
            MockTestQuestionDto,
            GenerateResponse,
            CursorRequest,
            CursorResponse,
            DirectionDto,
            SelectAnswerRequest,
            AnswerSelection,
            AnswerProgressResponse,
            SubmitResponse,
            AnswerResultDto,
            PageRequest,
            PageResponse,
            ChatRequest,
            ChatResponse,
            ChatMessageDto,
        )
    ),
    tags(
        (name = "Study Assistant API", description = "API endpoints for notes, generated study material, and tutor chat.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Session Lifecycle Handlers
//=========================================================================================

/// Create a new, empty study session.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = CreateSessionResponse)
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let session = app_state.sessions.create().await;
    info!(session_id = %session.id, "Created study session");
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
        }),
    )
}

/// Fetch the full client-visible state of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Current session state", body = SessionSnapshot),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionSnapshot::from(&*session)))
}

//=========================================================================================
// Notes Handlers
//=========================================================================================

/// Replace or append to the session's notes.
#[utoipa::path(
    put,
    path = "/sessions/{id}/notes",
    request_body = UpdateNotesRequest,
    responses(
        (status = 200, description = "Notes updated", body = NotesResponse),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn update_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let mut session = handle.lock().await;
    if request.append {
        session.append_notes(&request.text);
    } else {
        session.replace_notes(request.text);
    }
    Ok(Json(NotesResponse {
        notes_chars: session.notes.chars().count(),
    }))
}

/// Load notes from an uploaded text file, replacing the current buffer.
///
/// Accepts a multipart/form-data request with a single `file` part.
#[utoipa::path(
    post,
    path = "/sessions/{id}/notes/upload",
    request_body(content_type = "multipart/form-data", description = "The notes file to upload."),
    responses(
        (status = 200, description = "Notes replaced with the file contents", body = NotesResponse),
        (status = 400, description = "Missing file part or non-UTF-8 contents"),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn upload_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;

    let mut text: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        text = Some(String::from_utf8(data.to_vec()).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Uploaded file is not valid UTF-8 text: {}", e),
            )
        })?);
        break;
    }

    let text = text.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Multipart form must include a 'file' part".to_string(),
        )
    })?;

    let mut session = handle.lock().await;
    session.replace_notes(text);
    Ok(Json(NotesResponse {
        notes_chars: session.notes.chars().count(),
    }))
}

/// Clear the notes and every piece of material derived from them.
///
/// Idempotent: clearing an already-empty session succeeds.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/notes",
    responses(
        (status = 200, description = "Notes and derived material cleared", body = NotesResponse),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn clear_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let mut session = handle.lock().await;
    session.clear_notes();
    Ok(Json(NotesResponse { notes_chars: 0 }))
}

//=========================================================================================
// Export Handler
//=========================================================================================

fn slot_as_set(session: &StudySession, kind: MaterialKind) -> MaterialSet {
    match kind {
        MaterialKind::Flashcards => MaterialSet::Flashcards(session.flashcards.clone()),
        MaterialKind::Mcqs => MaterialSet::Mcqs(session.mcqs.clone()),
        MaterialKind::MockTest => MaterialSet::MockTest(session.mock_test.clone()),
    }
}

/// Download one material slot as a plain-text file.
#[utoipa::path(
    get,
    path = "/sessions/{id}/export/{material}",
    responses(
        (status = 200, description = "Plain-text rendering of the requested material", content_type = "text/plain"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "The requested material has not been generated yet")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID."),
        ("material" = String, Path, description = "One of `flashcards`, `mcqs`, `mock-test`.")
    )
)]
pub async fn export_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, kind)): Path<(Uuid, MaterialKind)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let set = {
        let session = handle.lock().await;
        slot_as_set(&session, kind)
    };

    if set.is_empty() {
        return Err((
            StatusCode::CONFLICT,
            format!(
                "No {} to export yet; generate them first",
                set.material_type().display_name()
            ),
        ));
    }

    let filename = export::suggested_filename(set.material_type());
    let body = export::render(&set);
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
