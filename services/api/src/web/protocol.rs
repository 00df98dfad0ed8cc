//! services/api/src/web/protocol.rs
//!
//! Defines the JSON wire types exchanged between the browser client and the
//! API server. Domain types never cross the HTTP boundary directly; they are
//! mapped into these DTOs so the wire format can stay stable while the core
//! evolves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use study_assistant_core::domain::{
    ChatMessage, Flashcard, MaterialSet, MaterialType, Mcq, MockTestQuestion,
};
use study_assistant_core::session::{AnswerResult, Direction, StudySession};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Shared Enums
//=========================================================================================

/// Wire name for a material kind. URLs accept `mock-test` as an alias for
/// the JSON spelling `mockTest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MaterialKind {
    #[serde(rename = "flashcards")]
    Flashcards,
    #[serde(rename = "mcqs")]
    Mcqs,
    #[serde(rename = "mockTest", alias = "mock-test")]
    MockTest,
}

impl From<MaterialKind> for MaterialType {
    fn from(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Flashcards => MaterialType::Flashcards,
            MaterialKind::Mcqs => MaterialType::Mcqs,
            MaterialKind::MockTest => MaterialType::MockTest,
        }
    }
}

impl From<MaterialType> for MaterialKind {
    fn from(material: MaterialType) -> Self {
        match material {
            MaterialType::Flashcards => MaterialKind::Flashcards,
            MaterialType::Mcqs => MaterialKind::Mcqs,
            MaterialType::MockTest => MaterialKind::MockTest,
        }
    }
}

/// Navigation direction for cursor and page endpoints.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DirectionDto {
    Next,
    Previous,
}

impl From<DirectionDto> for Direction {
    fn from(direction: DirectionDto) -> Self {
        match direction {
            DirectionDto::Next => Direction::Next,
            DirectionDto::Previous => Direction::Previous,
        }
    }
}

/// Where the records in a generation response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MaterialSource {
    /// Normalized from a live agent reply.
    Agent,
    /// Fixed demo records substituted after a failed generation run.
    Fallback,
}

//=========================================================================================
// Record DTOs
//=========================================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardDto {
    pub question: String,
    pub answer: String,
}

impl From<&Flashcard> for FlashcardDto {
    fn from(card: &Flashcard) -> Self {
        Self {
            question: card.question.clone(),
            answer: card.answer.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct McqDto {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl From<&Mcq> for McqDto {
    fn from(mcq: &Mcq) -> Self {
        Self {
            question: mcq.question.clone(),
            options: mcq.options.clone(),
            correct_answer: mcq.correct_answer.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MockTestQuestionDto {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl From<&MockTestQuestion> for MockTestQuestionDto {
    fn from(question: &MockTestQuestion) -> Self {
        Self {
            question: question.question.clone(),
            options: question.options.clone(),
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        }
    }
}

/// One generated batch, shaped by its kind.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum MaterialRecords {
    Flashcards(Vec<FlashcardDto>),
    Mcqs(Vec<McqDto>),
    MockTest(Vec<MockTestQuestionDto>),
}

impl From<&MaterialSet> for MaterialRecords {
    fn from(set: &MaterialSet) -> Self {
        match set {
            MaterialSet::Flashcards(items) => {
                MaterialRecords::Flashcards(items.iter().map(Into::into).collect())
            }
            MaterialSet::Mcqs(items) => {
                MaterialRecords::Mcqs(items.iter().map(Into::into).collect())
            }
            MaterialSet::MockTest(items) => {
                MaterialRecords::MockTest(items.iter().map(Into::into).collect())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: Uuid,
    /// Either `user` or `assistant`.
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

//=========================================================================================
// Request Bodies
//=========================================================================================

/// Body for `PUT /sessions/{id}/notes`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotesRequest {
    pub text: String,
    /// When true the text is appended to the existing notes instead of
    /// replacing them.
    #[serde(default)]
    pub append: bool,
}

/// Body for `POST /sessions/{id}/flashcards/cursor`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CursorRequest {
    pub direction: DirectionDto,
}

/// Body for `POST /sessions/{id}/answers`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectAnswerRequest {
    pub question_index: usize,
    /// Full text of the chosen option.
    pub option: String,
}

/// Body for `POST /sessions/{id}/mock-test/page`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PageRequest {
    pub direction: DirectionDto,
}

/// Body for `POST /sessions/{id}/chat`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

//=========================================================================================
// Response Bodies
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Returned by the notes endpoints; reports the buffer size after the change.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotesResponse {
    pub notes_chars: usize,
}

/// One selected answer, as stored in the session.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSelection {
    pub question_index: usize,
    pub option: String,
}

/// The full client-visible state of a session.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub notes: String,
    pub active_material: Option<MaterialKind>,
    pub flashcards: Vec<FlashcardDto>,
    pub mcqs: Vec<McqDto>,
    pub mock_test: Vec<MockTestQuestionDto>,
    pub card_cursor: usize,
    pub answers: Vec<AnswerSelection>,
    pub results_visible: bool,
    pub mock_test_page: usize,
    pub transcript: Vec<ChatMessageDto>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl From<&StudySession> for SessionSnapshot {
    fn from(session: &StudySession) -> Self {
        Self {
            session_id: session.id,
            notes: session.notes.clone(),
            active_material: session.active_material.map(Into::into),
            flashcards: session.flashcards.iter().map(Into::into).collect(),
            mcqs: session.mcqs.iter().map(Into::into).collect(),
            mock_test: session.mock_test.iter().map(Into::into).collect(),
            card_cursor: session.card_cursor,
            answers: session
                .answers
                .iter()
                .map(|(&question_index, option)| AnswerSelection {
                    question_index,
                    option: option.clone(),
                })
                .collect(),
            results_visible: session.results_visible,
            mock_test_page: session.mock_test_page,
            transcript: session.transcript.iter().map(Into::into).collect(),
            created_at: session.created_at,
            last_accessed_at: session.last_accessed_at,
        }
    }
}

/// Result of a generation run. `source` tells the client whether it is
/// looking at real material or the demo substitute, and `notice` carries the
/// user-facing explanation in the fallback case.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub material: MaterialKind,
    pub source: MaterialSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub records: MaterialRecords,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursorResponse {
    pub card_cursor: usize,
    pub total: usize,
}

/// Progress through the quiz, returned by select and reset.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerProgressResponse {
    pub answered: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResultDto {
    pub question_index: usize,
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl From<&AnswerResult> for AnswerResultDto {
    fn from(result: &AnswerResult) -> Self {
        Self {
            question_index: result.question_index,
            selected: result.selected.clone(),
            correct_answer: result.correct_answer.clone(),
            is_correct: result.is_correct,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub score: usize,
    pub total: usize,
    pub results: Vec<AnswerResultDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub page: usize,
    pub page_count: usize,
    pub questions: Vec<MockTestQuestionDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: ChatMessageDto,
    pub transcript_len: usize,
}
