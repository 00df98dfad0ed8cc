//! crates/study_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any wire format or serialization library.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// How many flashcards one generation run asks the agent for.
pub const FLASHCARD_TARGET_COUNT: usize = 8;
/// How many multiple-choice questions one generation run asks the agent for.
pub const MCQ_TARGET_COUNT: usize = 8;
/// How many mock-test questions one generation run asks the agent for.
pub const MOCK_TEST_TARGET_COUNT: usize = 10;
/// Options a well-formed multiple-choice question must carry.
pub const MCQ_OPTION_COUNT: usize = 4;
/// Mock-test questions shown per page.
pub const MOCK_TEST_PAGE_SIZE: usize = 5;

/// The three kinds of study material the agent can produce from notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialType {
    Flashcards,
    Mcqs,
    MockTest,
}

impl MaterialType {
    /// The JSON field name the agent uses when it wraps records in an object
    /// instead of returning a bare array.
    pub fn field_name(&self) -> &'static str {
        match self {
            MaterialType::Flashcards => "flashcards",
            MaterialType::Mcqs => "mcqs",
            MaterialType::MockTest => "mockTest",
        }
    }

    /// Human-readable name, used in notices and export headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialType::Flashcards => "flashcards",
            MaterialType::Mcqs => "multiple-choice questions",
            MaterialType::MockTest => "mock test",
        }
    }

    /// How many records one generation run requests from the agent.
    pub fn target_count(&self) -> usize {
        match self {
            MaterialType::Flashcards => FLASHCARD_TARGET_COUNT,
            MaterialType::Mcqs => MCQ_TARGET_COUNT,
            MaterialType::MockTest => MOCK_TEST_TARGET_COUNT,
        }
    }
}

/// A single question-and-answer study card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// A multiple-choice question. `correct_answer` holds the full text of the
/// right option, not an index into `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// A mock-test question: like an [`Mcq`] but with a worked explanation, and
/// with a looser shape. Open-answer questions carry no options and
/// true/false questions carry two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTestQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

/// One batch of generated study material, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSet {
    Flashcards(Vec<Flashcard>),
    Mcqs(Vec<Mcq>),
    MockTest(Vec<MockTestQuestion>),
}

impl MaterialSet {
    pub fn material_type(&self) -> MaterialType {
        match self {
            MaterialSet::Flashcards(_) => MaterialType::Flashcards,
            MaterialSet::Mcqs(_) => MaterialType::Mcqs,
            MaterialSet::MockTest(_) => MaterialType::MockTest,
        }
    }

    /// An empty batch of the given kind.
    pub fn empty(material: MaterialType) -> Self {
        match material {
            MaterialType::Flashcards => MaterialSet::Flashcards(Vec::new()),
            MaterialType::Mcqs => MaterialSet::Mcqs(Vec::new()),
            MaterialType::MockTest => MaterialSet::MockTest(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MaterialSet::Flashcards(items) => items.len(),
            MaterialSet::Mcqs(items) => items.len(),
            MaterialSet::MockTest(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks every record against the shape rules for its kind and reports
    /// the first violation. Agent output crosses this gate before it is ever
    /// stored or rendered; records that fail here are treated the same as an
    /// unparseable reply.
    pub fn validate(&self) -> Result<(), MalformedRecord> {
        match self {
            MaterialSet::Flashcards(items) => {
                for (index, card) in items.iter().enumerate() {
                    validate_flashcard(index, card)?;
                }
            }
            MaterialSet::Mcqs(items) => {
                for (index, mcq) in items.iter().enumerate() {
                    validate_mcq(index, mcq)?;
                }
            }
            MaterialSet::MockTest(items) => {
                for (index, question) in items.iter().enumerate() {
                    validate_mock_test_question(index, question)?;
                }
            }
        }
        Ok(())
    }
}

/// A record that failed shape validation, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {index}: {reason}")]
pub struct MalformedRecord {
    pub index: usize,
    pub reason: String,
}

impl MalformedRecord {
    fn new(index: usize, reason: impl Into<String>) -> Self {
        MalformedRecord {
            index,
            reason: reason.into(),
        }
    }
}

fn validate_flashcard(index: usize, card: &Flashcard) -> Result<(), MalformedRecord> {
    if card.question.trim().is_empty() {
        return Err(MalformedRecord::new(index, "flashcard question is empty"));
    }
    if card.answer.trim().is_empty() {
        return Err(MalformedRecord::new(index, "flashcard answer is empty"));
    }
    Ok(())
}

fn validate_mcq(index: usize, mcq: &Mcq) -> Result<(), MalformedRecord> {
    if mcq.question.trim().is_empty() {
        return Err(MalformedRecord::new(index, "question text is empty"));
    }
    if mcq.options.len() != MCQ_OPTION_COUNT {
        return Err(MalformedRecord::new(
            index,
            format!("expected {MCQ_OPTION_COUNT} options, got {}", mcq.options.len()),
        ));
    }
    if mcq.options.iter().any(|option| option.trim().is_empty()) {
        return Err(MalformedRecord::new(index, "an option is empty"));
    }
    if !mcq.options.contains(&mcq.correct_answer) {
        return Err(MalformedRecord::new(
            index,
            "correct answer is not one of the options",
        ));
    }
    Ok(())
}

fn validate_mock_test_question(
    index: usize,
    question: &MockTestQuestion,
) -> Result<(), MalformedRecord> {
    if question.question.trim().is_empty() {
        return Err(MalformedRecord::new(index, "question text is empty"));
    }
    if question.correct_answer.trim().is_empty() {
        return Err(MalformedRecord::new(index, "correct answer is empty"));
    }
    if question.options.iter().any(|option| option.trim().is_empty()) {
        return Err(MalformedRecord::new(index, "an option is empty"));
    }
    // Open-answer questions have no options. When options are present the
    // correct answer must be among them.
    if !question.options.is_empty() && !question.options.contains(&question.correct_answer) {
        return Err(MalformedRecord::new(
            index,
            "correct answer is not one of the options",
        ));
    }
    Ok(())
}

/// Who authored a chat transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single tutor-chat turn. The transcript is append-only and lives only as
/// long as its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
