//! crates/study_assistant_core/src/session.rs
//!
//! The per-session state machine: notes, the three material slots, and the
//! view state that drives flashcard review, quiz taking, and mock-test
//! paging. Everything here is volatile and lives only in process memory.

use crate::domain::{
    ChatMessage, Flashcard, MaterialSet, MaterialType, Mcq, MockTestQuestion, Role,
    MOCK_TEST_PAGE_SIZE,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Navigation direction for the flashcard cursor and mock-test pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Why a session operation was refused. These map onto client mistakes,
/// never onto internal faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionOpError {
    #[error("question index {0} is out of range")]
    QuestionOutOfRange(usize),
    #[error("answers are locked after submission; reset the quiz to retake it")]
    AlreadySubmitted,
    #[error("only {answered} of {total} questions answered; submission needs all of them")]
    Incomplete { answered: usize, total: usize },
    #[error("no {0} have been generated yet")]
    NoMaterial(&'static str),
}

/// The graded outcome for one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub question_index: usize,
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// All state for one study session.
///
/// Notes, generated material, and the chat transcript share a lifetime: the
/// session. Nothing is persisted; dropping the session drops everything.
#[derive(Debug, Clone)]
pub struct StudySession {
    pub id: Uuid,
    pub notes: String,
    pub flashcards: Vec<Flashcard>,
    pub mcqs: Vec<Mcq>,
    pub mock_test: Vec<MockTestQuestion>,
    /// The material kind generated most recently, if any.
    pub active_material: Option<MaterialType>,
    /// Index of the flashcard currently shown, clamped to the deck.
    pub card_cursor: usize,
    /// Selected option text per question index. Keys are always valid
    /// indices into `mcqs` because [`StudySession::select_answer`] checks them.
    pub answers: BTreeMap<usize, String>,
    /// Set once a complete answer map is submitted; cleared on reset.
    pub results_visible: bool,
    /// Zero-based mock-test page, clamped to the page count.
    pub mock_test_page: usize,
    pub transcript: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl StudySession {
    pub fn new() -> Self {
        let now = Utc::now();
        StudySession {
            id: Uuid::new_v4(),
            notes: String::new(),
            flashcards: Vec::new(),
            mcqs: Vec::new(),
            mock_test: Vec::new(),
            active_material: None,
            card_cursor: 0,
            answers: BTreeMap::new(),
            results_visible: false,
            mock_test_page: 0,
            transcript: Vec::new(),
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    //=====================================================================================
    // Notes
    //=====================================================================================

    /// Replaces the notes buffer wholesale. Existing material stays valid
    /// until the next generation run.
    pub fn replace_notes(&mut self, text: impl Into<String>) {
        self.notes = text.into();
    }

    /// Appends to the notes buffer, separating from existing text with a
    /// newline so pasted and uploaded chunks do not run together.
    pub fn append_notes(&mut self, text: &str) {
        if !self.notes.is_empty() && !self.notes.ends_with('\n') {
            self.notes.push('\n');
        }
        self.notes.push_str(text);
    }

    /// The "start over" reset: clears notes, all three material slots, and
    /// every piece of view state. The chat transcript survives. Calling this
    /// on an already-empty session is a no-op.
    pub fn clear_notes(&mut self) {
        self.notes.clear();
        self.flashcards.clear();
        self.mcqs.clear();
        self.mock_test.clear();
        self.active_material = None;
        self.reset_views();
    }

    //=====================================================================================
    // Material slots
    //=====================================================================================

    /// Installs a freshly generated batch into its slot and resets the view
    /// state, so stale cursors and answers never point into a new batch.
    pub fn install_material(&mut self, set: MaterialSet) {
        let material = set.material_type();
        match set {
            MaterialSet::Flashcards(items) => self.flashcards = items,
            MaterialSet::Mcqs(items) => self.mcqs = items,
            MaterialSet::MockTest(items) => self.mock_test = items,
        }
        self.active_material = Some(material);
        self.reset_views();
    }

    fn reset_views(&mut self) {
        self.card_cursor = 0;
        self.answers.clear();
        self.results_visible = false;
        self.mock_test_page = 0;
    }

    //=====================================================================================
    // Flashcard review
    //=====================================================================================

    /// Moves the flashcard cursor one step, clamped to both deck edges, and
    /// returns the new position. With an empty deck the cursor stays at 0.
    pub fn advance_card(&mut self, direction: Direction) -> usize {
        let last = self.flashcards.len().saturating_sub(1);
        self.card_cursor = match direction {
            Direction::Next => (self.card_cursor + 1).min(last),
            Direction::Previous => self.card_cursor.saturating_sub(1),
        };
        self.card_cursor
    }

    //=====================================================================================
    // Quiz answers
    //=====================================================================================

    /// Records (or changes) the selected option for one question. Refused
    /// after submission until the quiz is reset.
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionOpError> {
        if self.mcqs.is_empty() {
            return Err(SessionOpError::NoMaterial(
                MaterialType::Mcqs.display_name(),
            ));
        }
        if question_index >= self.mcqs.len() {
            return Err(SessionOpError::QuestionOutOfRange(question_index));
        }
        if self.results_visible {
            return Err(SessionOpError::AlreadySubmitted);
        }
        self.answers.insert(question_index, option.into());
        Ok(())
    }

    /// Grades the quiz. Refused while any question is unanswered, so partial
    /// submissions can never produce a score.
    pub fn submit_answers(&mut self) -> Result<Vec<AnswerResult>, SessionOpError> {
        if self.mcqs.is_empty() {
            return Err(SessionOpError::NoMaterial(
                MaterialType::Mcqs.display_name(),
            ));
        }
        if self.results_visible {
            return Err(SessionOpError::AlreadySubmitted);
        }
        if self.answers.len() != self.mcqs.len() {
            return Err(SessionOpError::Incomplete {
                answered: self.answers.len(),
                total: self.mcqs.len(),
            });
        }
        // select_answer only admits indices below mcqs.len(), so a full map
        // covers every question exactly once.
        let results = self
            .mcqs
            .iter()
            .enumerate()
            .map(|(question_index, mcq)| {
                let selected = self.answers[&question_index].clone();
                let is_correct = selected == mcq.correct_answer;
                AnswerResult {
                    question_index,
                    selected,
                    correct_answer: mcq.correct_answer.clone(),
                    is_correct,
                }
            })
            .collect();
        self.results_visible = true;
        Ok(results)
    }

    /// Clears selections and the results flag so the quiz can be retaken.
    /// The questions themselves stay.
    pub fn reset_answers(&mut self) {
        self.answers.clear();
        self.results_visible = false;
    }

    //=====================================================================================
    // Mock-test paging
    //=====================================================================================

    pub fn mock_test_page_count(&self) -> usize {
        self.mock_test.len().div_ceil(MOCK_TEST_PAGE_SIZE)
    }

    /// Turns the mock-test page one step, clamped to the page range, and
    /// returns the new page index.
    pub fn turn_page(&mut self, direction: Direction) -> usize {
        let last = self.mock_test_page_count().saturating_sub(1);
        self.mock_test_page = match direction {
            Direction::Next => (self.mock_test_page + 1).min(last),
            Direction::Previous => self.mock_test_page.saturating_sub(1),
        };
        self.mock_test_page
    }

    /// The questions on the current page, at most [`MOCK_TEST_PAGE_SIZE`].
    pub fn current_page(&self) -> &[MockTestQuestion] {
        let start = self.mock_test_page * MOCK_TEST_PAGE_SIZE;
        if start >= self.mock_test.len() {
            return &[];
        }
        let end = (start + MOCK_TEST_PAGE_SIZE).min(self.mock_test.len());
        &self.mock_test[start..end]
    }

    //=====================================================================================
    // Tutor chat
    //=====================================================================================

    /// Appends one turn to the transcript and returns it.
    pub fn push_chat(&mut self, role: Role, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::new(role, content);
        self.transcript.push(message.clone());
        message
    }
}

impl Default for StudySession {
    fn default() -> Self {
        StudySession::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(n: usize) -> Flashcard {
        Flashcard {
            question: format!("Question {n}"),
            answer: format!("Answer {n}"),
        }
    }

    fn mcq(n: usize) -> Mcq {
        Mcq {
            question: format!("Question {n}"),
            options: vec![
                "Alpha".to_string(),
                "Beta".to_string(),
                "Gamma".to_string(),
                "Delta".to_string(),
            ],
            correct_answer: "Beta".to_string(),
        }
    }

    fn mock_question(n: usize) -> MockTestQuestion {
        MockTestQuestion {
            question: format!("Question {n}"),
            options: vec!["True".to_string(), "False".to_string()],
            correct_answer: "True".to_string(),
            explanation: format!("Explanation {n}"),
        }
    }

    #[test]
    fn cursor_clamps_at_both_deck_edges() {
        let mut session = StudySession::new();
        session.install_material(MaterialSet::Flashcards(vec![card(1), card(2)]));

        assert_eq!(session.advance_card(Direction::Previous), 0);
        assert_eq!(session.advance_card(Direction::Next), 1);
        assert_eq!(session.advance_card(Direction::Next), 1);
        assert_eq!(session.advance_card(Direction::Previous), 0);
    }

    #[test]
    fn cursor_stays_at_zero_with_empty_deck() {
        let mut session = StudySession::new();
        assert_eq!(session.advance_card(Direction::Next), 0);
        assert_eq!(session.advance_card(Direction::Previous), 0);
    }

    #[test]
    fn new_batch_resets_the_cursor() {
        let mut session = StudySession::new();
        session.install_material(MaterialSet::Flashcards(vec![card(1), card(2), card(3)]));
        session.advance_card(Direction::Next);
        session.advance_card(Direction::Next);
        assert_eq!(session.card_cursor, 2);

        session.install_material(MaterialSet::Flashcards(vec![card(4)]));
        assert_eq!(session.card_cursor, 0);
    }

    #[test]
    fn submit_is_refused_until_every_question_is_answered() {
        let mut session = StudySession::new();
        session.install_material(MaterialSet::Mcqs(vec![mcq(1), mcq(2), mcq(3)]));

        session.select_answer(0, "Beta").unwrap();
        session.select_answer(1, "Alpha").unwrap();
        assert_eq!(
            session.submit_answers().unwrap_err(),
            SessionOpError::Incomplete {
                answered: 2,
                total: 3
            }
        );

        session.select_answer(2, "Beta").unwrap();
        let results = session.submit_answers().unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_correct);
        assert!(!results[1].is_correct);
        assert_eq!(results[1].correct_answer, "Beta");
        assert!(session.results_visible);
    }

    #[test]
    fn answers_are_locked_after_submission() {
        let mut session = StudySession::new();
        session.install_material(MaterialSet::Mcqs(vec![mcq(1)]));
        session.select_answer(0, "Beta").unwrap();
        session.submit_answers().unwrap();

        assert_eq!(
            session.select_answer(0, "Alpha").unwrap_err(),
            SessionOpError::AlreadySubmitted
        );
        assert_eq!(
            session.submit_answers().unwrap_err(),
            SessionOpError::AlreadySubmitted
        );
    }

    #[test]
    fn reset_unlocks_the_quiz_and_clears_selections() {
        let mut session = StudySession::new();
        session.install_material(MaterialSet::Mcqs(vec![mcq(1)]));
        session.select_answer(0, "Beta").unwrap();
        session.submit_answers().unwrap();

        session.reset_answers();
        assert!(session.answers.is_empty());
        assert!(!session.results_visible);
        session.select_answer(0, "Gamma").unwrap();
    }

    #[test]
    fn out_of_range_selection_is_refused() {
        let mut session = StudySession::new();
        session.install_material(MaterialSet::Mcqs(vec![mcq(1), mcq(2)]));
        assert_eq!(
            session.select_answer(2, "Alpha").unwrap_err(),
            SessionOpError::QuestionOutOfRange(2)
        );
    }

    #[test]
    fn selection_without_material_is_refused() {
        let mut session = StudySession::new();
        assert!(matches!(
            session.select_answer(0, "Alpha").unwrap_err(),
            SessionOpError::NoMaterial(_)
        ));
    }

    #[test]
    fn reselecting_before_submit_overwrites() {
        let mut session = StudySession::new();
        session.install_material(MaterialSet::Mcqs(vec![mcq(1)]));
        session.select_answer(0, "Alpha").unwrap();
        session.select_answer(0, "Beta").unwrap();
        let results = session.submit_answers().unwrap();
        assert!(results[0].is_correct);
    }

    #[test]
    fn paging_clamps_and_slices_five_per_page() {
        let mut session = StudySession::new();
        let questions: Vec<_> = (0..10).map(mock_question).collect();
        session.install_material(MaterialSet::MockTest(questions));

        assert_eq!(session.mock_test_page_count(), 2);
        assert_eq!(session.current_page().len(), 5);
        assert_eq!(session.current_page()[0].question, "Question 0");

        assert_eq!(session.turn_page(Direction::Next), 1);
        assert_eq!(session.current_page()[0].question, "Question 5");
        assert_eq!(session.turn_page(Direction::Next), 1);
        assert_eq!(session.turn_page(Direction::Previous), 0);
        assert_eq!(session.turn_page(Direction::Previous), 0);
    }

    #[test]
    fn short_mock_test_has_a_single_page() {
        let mut session = StudySession::new();
        let questions: Vec<_> = (0..3).map(mock_question).collect();
        session.install_material(MaterialSet::MockTest(questions));

        assert_eq!(session.mock_test_page_count(), 1);
        assert_eq!(session.current_page().len(), 3);
        assert_eq!(session.turn_page(Direction::Next), 0);
    }

    #[test]
    fn empty_mock_test_pages_safely() {
        let mut session = StudySession::new();
        assert_eq!(session.mock_test_page_count(), 0);
        assert!(session.current_page().is_empty());
        assert_eq!(session.turn_page(Direction::Next), 0);
    }

    #[test]
    fn clear_notes_resets_material_and_view_state_but_keeps_chat() {
        let mut session = StudySession::new();
        session.replace_notes("The cell is the basic unit of life.");
        session.install_material(MaterialSet::Mcqs(vec![mcq(1)]));
        session.select_answer(0, "Beta").unwrap();
        session.push_chat(Role::User, "What is a cell?");

        session.clear_notes();
        assert!(session.notes.is_empty());
        assert!(session.mcqs.is_empty());
        assert!(session.answers.is_empty());
        assert!(session.active_material.is_none());
        assert!(!session.results_visible);
        assert_eq!(session.transcript.len(), 1);

        // Clearing twice is harmless.
        session.clear_notes();
        assert!(session.notes.is_empty());
    }

    #[test]
    fn append_notes_separates_chunks_with_a_newline() {
        let mut session = StudySession::new();
        session.append_notes("first chunk");
        session.append_notes("second chunk");
        assert_eq!(session.notes, "first chunk\nsecond chunk");
    }

    #[test]
    fn transcript_keeps_insertion_order() {
        let mut session = StudySession::new();
        session.push_chat(Role::User, "What is diffusion?");
        session.push_chat(Role::Assistant, "Movement from high to low concentration.");
        assert_eq!(session.transcript[0].role, Role::User);
        assert_eq!(session.transcript[1].role, Role::Assistant);
    }
}
