//! crates/study_assistant_core/src/fallback.rs
//!
//! Fixed placeholder material. Whenever a generation run fails, whether the
//! agent was unreachable, answered with an unusable reply, or returned zero
//! records, the caller substitutes these sets so the study view always has
//! something to show.

use crate::domain::{Flashcard, MaterialSet, MaterialType, Mcq, MockTestQuestion};

/// Shown alongside demo records so nobody mistakes them for material
/// generated from their own notes.
pub const FALLBACK_NOTICE: &str =
    "The study agent did not respond as expected, so sample material is shown instead. \
     Try generating again in a moment.";

/// The assistant turn substituted when a tutor call fails.
pub const TUTOR_APOLOGY: &str =
    "Sorry, I couldn't reach your tutor just now. Please send your question again in a moment.";

/// The fixed demo batch for `material`. Content is independent of the
/// student's notes and passes the same validation as agent output.
pub fn demo_set(material: MaterialType) -> MaterialSet {
    match material {
        MaterialType::Flashcards => MaterialSet::Flashcards(demo_flashcards()),
        MaterialType::Mcqs => MaterialSet::Mcqs(demo_mcqs()),
        MaterialType::MockTest => MaterialSet::MockTest(demo_mock_test()),
    }
}

fn demo_flashcards() -> Vec<Flashcard> {
    vec![
        Flashcard {
            question: "What is active recall?".to_string(),
            answer: "Testing yourself on material instead of rereading it, which strengthens \
                     memory far more effectively."
                .to_string(),
        },
        Flashcard {
            question: "What is spaced repetition?".to_string(),
            answer: "Reviewing material at growing intervals, timed to just before you would \
                     otherwise forget it."
                .to_string(),
        },
        Flashcard {
            question: "Why does teaching a topic help you learn it?".to_string(),
            answer: "Explaining forces you to organise the material and exposes gaps in your \
                     understanding."
                .to_string(),
        },
    ]
}

fn demo_mcqs() -> Vec<Mcq> {
    vec![
        Mcq {
            question: "Which study technique is generally most effective for long-term retention?"
                .to_string(),
            options: vec![
                "Rereading the textbook".to_string(),
                "Highlighting key passages".to_string(),
                "Active recall with spaced repetition".to_string(),
                "Listening to recorded lectures".to_string(),
            ],
            correct_answer: "Active recall with spaced repetition".to_string(),
        },
        Mcq {
            question: "What is the main drawback of cramming the night before an exam?"
                .to_string(),
            options: vec![
                "It takes too much paper".to_string(),
                "The material fades quickly without spaced review".to_string(),
                "It only works for mathematics".to_string(),
                "It requires a study group".to_string(),
            ],
            correct_answer: "The material fades quickly without spaced review".to_string(),
        },
        Mcq {
            question: "Interleaving means:".to_string(),
            options: vec![
                "Studying one topic until it is perfect".to_string(),
                "Mixing related topics within a single study session".to_string(),
                "Taking breaks every five minutes".to_string(),
                "Copying notes by hand".to_string(),
            ],
            correct_answer: "Mixing related topics within a single study session".to_string(),
        },
    ]
}

fn demo_mock_test() -> Vec<MockTestQuestion> {
    vec![
        MockTestQuestion {
            question: "Briefly explain the testing effect.".to_string(),
            options: Vec::new(),
            correct_answer: "Retrieving information from memory strengthens the memory itself, \
                             so practice tests beat passive review."
                .to_string(),
            explanation: "Retrieval practice is itself a learning event, not just a measurement \
                          of learning."
                .to_string(),
        },
        MockTestQuestion {
            question: "Highlighting text is one of the most effective study techniques."
                .to_string(),
            options: vec!["True".to_string(), "False".to_string()],
            correct_answer: "False".to_string(),
            explanation: "Highlighting feels productive but barely improves retention compared \
                          with retrieval practice."
                .to_string(),
        },
        MockTestQuestion {
            question: "Which schedule best exploits spaced repetition?".to_string(),
            options: vec![
                "Review everything every day".to_string(),
                "Review at growing intervals: one day, three days, a week".to_string(),
                "Review only the night before the exam".to_string(),
                "Review once and never again".to_string(),
            ],
            correct_answer: "Review at growing intervals: one day, three days, a week".to_string(),
            explanation: "Expanding intervals revisit material just as it is about to fade, \
                          which is when review helps most."
                .to_string(),
        },
    ]
}
