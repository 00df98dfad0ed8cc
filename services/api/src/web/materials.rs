//! services/api/src/web/materials.rs
//!
//! Handlers for generating study material and for the view-state machines
//! that present it: the flashcard cursor, the quiz answer map, and the
//! mock-test pager.

use crate::web::protocol::{
    AnswerProgressResponse, AnswerResultDto, CursorRequest, CursorResponse, GenerateResponse,
    MaterialKind, MaterialSource, PageRequest, PageResponse, SelectAnswerRequest, SubmitResponse,
};
use crate::web::{load_session, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use study_assistant_core::domain::MaterialType;
use study_assistant_core::fallback;
use study_assistant_core::session::SessionOpError;
use tracing::{info, warn};
use uuid::Uuid;

//=========================================================================================
// Generation
//=========================================================================================

/// Generate one batch of study material from the session's notes.
///
/// A failed generation run, whether the agent was unreachable, replied with
/// something unusable, or produced zero records, degrades to fixed demo
/// material with an explanatory notice. The session always ends up with
/// records installed either way.
#[utoipa::path(
    post,
    path = "/sessions/{id}/materials/{material}",
    responses(
        (status = 200, description = "Material installed, from the agent or the demo fallback", body = GenerateResponse),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "The session has no notes to generate from")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID."),
        ("material" = String, Path, description = "One of `flashcards`, `mcqs`, `mock-test`.")
    )
)]
pub async fn generate_material_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, kind)): Path<(Uuid, MaterialKind)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let material = MaterialType::from(kind);
    let handle = load_session(&app_state, id).await?;

    // Snapshot the notes and release the lock before the agent call; a slow
    // upstream must not block the session's other endpoints.
    let notes = {
        let session = handle.lock().await;
        if session.notes.trim().is_empty() {
            return Err((
                StatusCode::CONFLICT,
                "The session has no notes; paste or upload some first".to_string(),
            ));
        }
        session.notes.clone()
    };

    let (set, source, notice) = match app_state.study_adapter.generate(&notes, material).await {
        Ok(set) if !set.is_empty() => {
            info!(
                session_id = %id,
                material = material.display_name(),
                records = set.len(),
                "Installed agent-generated material"
            );
            (set, MaterialSource::Agent, None)
        }
        Ok(_) => {
            warn!(
                session_id = %id,
                material = material.display_name(),
                "Agent reply contained zero records; substituting demo material"
            );
            (
                fallback::demo_set(material),
                MaterialSource::Fallback,
                Some(fallback::FALLBACK_NOTICE.to_string()),
            )
        }
        Err(e) => {
            warn!(
                session_id = %id,
                material = material.display_name(),
                error = %e,
                "Generation failed; substituting demo material"
            );
            (
                fallback::demo_set(material),
                MaterialSource::Fallback,
                Some(fallback::FALLBACK_NOTICE.to_string()),
            )
        }
    };

    let records = (&set).into();
    handle.lock().await.install_material(set);

    Ok(Json(GenerateResponse {
        material: kind,
        source,
        notice,
        records,
    }))
}

//=========================================================================================
// Flashcard Cursor
//=========================================================================================

/// Move the flashcard cursor one step, clamped to the deck.
#[utoipa::path(
    post,
    path = "/sessions/{id}/flashcards/cursor",
    request_body = CursorRequest,
    responses(
        (status = 200, description = "New cursor position", body = CursorResponse),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn advance_cursor_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CursorRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let mut session = handle.lock().await;
    let card_cursor = session.advance_card(request.direction.into());
    Ok(Json(CursorResponse {
        card_cursor,
        total: session.flashcards.len(),
    }))
}

//=========================================================================================
// Quiz Answers
//=========================================================================================

fn op_error(err: SessionOpError) -> (StatusCode, String) {
    let status = match err {
        SessionOpError::QuestionOutOfRange(_) => StatusCode::BAD_REQUEST,
        SessionOpError::AlreadySubmitted
        | SessionOpError::Incomplete { .. }
        | SessionOpError::NoMaterial(_) => StatusCode::CONFLICT,
    };
    (status, err.to_string())
}

/// Select (or change) the answer to one quiz question.
#[utoipa::path(
    post,
    path = "/sessions/{id}/answers",
    request_body = SelectAnswerRequest,
    responses(
        (status = 200, description = "Answer recorded", body = AnswerProgressResponse),
        (status = 400, description = "Question index out of range"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "No quiz generated, or answers already submitted")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn select_answer_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let mut session = handle.lock().await;
    session
        .select_answer(request.question_index, request.option)
        .map_err(op_error)?;
    Ok(Json(AnswerProgressResponse {
        answered: session.answers.len(),
        total: session.mcqs.len(),
    }))
}

/// Submit the quiz for grading. Refused until every question is answered.
#[utoipa::path(
    post,
    path = "/sessions/{id}/answers/submit",
    responses(
        (status = 200, description = "Graded results", body = SubmitResponse),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Unanswered questions remain, or already submitted")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn submit_answers_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let mut session = handle.lock().await;
    let results = session.submit_answers().map_err(op_error)?;
    let score = results.iter().filter(|result| result.is_correct).count();
    Ok(Json(SubmitResponse {
        score,
        total: results.len(),
        results: results.iter().map(AnswerResultDto::from).collect(),
    }))
}

/// Clear all selections and hide results so the quiz can be retaken.
#[utoipa::path(
    post,
    path = "/sessions/{id}/answers/reset",
    responses(
        (status = 200, description = "Selections cleared", body = AnswerProgressResponse),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn reset_answers_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let mut session = handle.lock().await;
    session.reset_answers();
    Ok(Json(AnswerProgressResponse {
        answered: 0,
        total: session.mcqs.len(),
    }))
}

//=========================================================================================
// Mock-Test Paging
//=========================================================================================

/// Turn the mock-test page and return the questions now in view.
#[utoipa::path(
    post,
    path = "/sessions/{id}/mock-test/page",
    request_body = PageRequest,
    responses(
        (status = 200, description = "Current page of questions", body = PageResponse),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID.")
    )
)]
pub async fn turn_page_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<PageRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let handle = load_session(&app_state, id).await?;
    let mut session = handle.lock().await;
    let page = session.turn_page(request.direction.into());
    Ok(Json(PageResponse {
        page,
        page_count: session.mock_test_page_count(),
        questions: session.current_page().iter().map(Into::into).collect(),
    }))
}
