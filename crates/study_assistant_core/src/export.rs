//! crates/study_assistant_core/src/export.rs
//!
//! Plain-text export. Each material kind renders to a stable, labeled
//! template users can save or print; the labels double as a parse format
//! so exports are machine-recoverable.

use crate::domain::{Flashcard, MaterialSet, MaterialType, Mcq, MockTestQuestion};

/// The download filename for each material kind.
pub fn suggested_filename(material: MaterialType) -> &'static str {
    match material {
        MaterialType::Flashcards => "flashcards.txt",
        MaterialType::Mcqs => "mcqs.txt",
        MaterialType::MockTest => "mock-test.txt",
    }
}

/// Renders one batch as plain text.
pub fn render(set: &MaterialSet) -> String {
    match set {
        MaterialSet::Flashcards(items) => render_flashcards(items),
        MaterialSet::Mcqs(items) => render_mcqs(items),
        MaterialSet::MockTest(items) => render_mock_test(items),
    }
}

fn header(title: &str) -> String {
    format!("{title}\n{}\n\n", "=".repeat(title.len()))
}

fn render_flashcards(cards: &[Flashcard]) -> String {
    let mut out = header("Flashcards");
    for (i, card) in cards.iter().enumerate() {
        out.push_str(&format!("Flashcard {}\n", i + 1));
        out.push_str(&format!("Question: {}\n", card.question));
        out.push_str(&format!("Answer: {}\n\n", card.answer));
    }
    out
}

fn render_mcqs(mcqs: &[Mcq]) -> String {
    let mut out = header("Multiple Choice Questions");
    for (i, mcq) in mcqs.iter().enumerate() {
        out.push_str(&format!("Question {}: {}\n", i + 1, mcq.question));
        for (j, option) in mcq.options.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", option_label(j), option));
        }
        out.push_str(&format!("Correct answer: {}\n\n", mcq.correct_answer));
    }
    out
}

fn render_mock_test(questions: &[MockTestQuestion]) -> String {
    let mut out = header("Mock Test");
    for (i, question) in questions.iter().enumerate() {
        out.push_str(&format!("Question {}: {}\n", i + 1, question.question));
        for (j, option) in question.options.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", option_label(j), option));
        }
        out.push_str(&format!("Correct answer: {}\n", question.correct_answer));
        out.push_str(&format!("Explanation: {}\n\n", question.explanation));
    }
    out
}

/// "A" through "Z" for ordinary option lists, falling back to the number
/// itself beyond that so oversized lists still render.
fn option_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled<'a>(line: &'a str, label: &str) -> Option<&'a str> {
        line.strip_prefix(label).map(str::trim)
    }

    fn option_line(line: &str) -> Option<&str> {
        let (head, rest) = line.split_once(". ")?;
        (head.len() == 1 && head.chars().all(|c| c.is_ascii_uppercase())).then(|| rest.trim())
    }

    /// Inverse of `render_flashcards`, for single-line fields.
    fn parse_flashcards(text: &str) -> Vec<Flashcard> {
        let mut cards = Vec::new();
        let mut question: Option<String> = None;
        for line in text.lines() {
            if let Some(q) = labeled(line, "Question:") {
                question = Some(q.to_string());
            } else if let Some(a) = labeled(line, "Answer:") {
                if let Some(q) = question.take() {
                    cards.push(Flashcard {
                        question: q,
                        answer: a.to_string(),
                    });
                }
            }
        }
        cards
    }

    /// Inverse of `render_mcqs`, for single-line fields.
    fn parse_mcqs(text: &str) -> Vec<Mcq> {
        let mut mcqs = Vec::new();
        let mut question: Option<String> = None;
        let mut options: Vec<String> = Vec::new();
        for line in text.lines() {
            if let Some(rest) = line.split_once("Question ").and_then(|(_, r)| r.split_once(": "))
            {
                question = Some(rest.1.trim().to_string());
                options.clear();
            } else if let Some(option) = option_line(line) {
                options.push(option.to_string());
            } else if let Some(answer) = labeled(line, "Correct answer:") {
                if let Some(q) = question.take() {
                    mcqs.push(Mcq {
                        question: q,
                        options: std::mem::take(&mut options),
                        correct_answer: answer.to_string(),
                    });
                }
            }
        }
        mcqs
    }

    fn sample_cards() -> Vec<Flashcard> {
        vec![
            Flashcard {
                question: "What is the powerhouse of the cell?".to_string(),
                answer: "The mitochondrion.".to_string(),
            },
            Flashcard {
                question: "Define osmosis.".to_string(),
                answer: "Diffusion of water across a semipermeable membrane.".to_string(),
            },
        ]
    }

    fn sample_mcqs() -> Vec<Mcq> {
        vec![Mcq {
            question: "Which process produces ATP?".to_string(),
            options: vec![
                "Photosynthesis".to_string(),
                "Cellular respiration".to_string(),
                "Transcription".to_string(),
                "Translation".to_string(),
            ],
            correct_answer: "Cellular respiration".to_string(),
        }]
    }

    #[test]
    fn flashcards_round_trip_through_the_export_format() {
        let cards = sample_cards();
        let text = render(&MaterialSet::Flashcards(cards.clone()));
        assert_eq!(parse_flashcards(&text), cards);
    }

    #[test]
    fn mcqs_round_trip_through_the_export_format() {
        let mcqs = sample_mcqs();
        let text = render(&MaterialSet::Mcqs(mcqs.clone()));
        assert_eq!(parse_mcqs(&text), mcqs);
    }

    #[test]
    fn mock_test_export_carries_options_answer_and_explanation() {
        let questions = vec![MockTestQuestion {
            question: "Osmosis requires ATP.".to_string(),
            options: vec!["True".to_string(), "False".to_string()],
            correct_answer: "False".to_string(),
            explanation: "Osmosis is passive transport.".to_string(),
        }];
        let text = render(&MaterialSet::MockTest(questions));
        assert!(text.starts_with("Mock Test\n=========\n"));
        assert!(text.contains("Question 1: Osmosis requires ATP."));
        assert!(text.contains("A. True"));
        assert!(text.contains("B. False"));
        assert!(text.contains("Correct answer: False"));
        assert!(text.contains("Explanation: Osmosis is passive transport."));
    }

    #[test]
    fn open_answer_questions_render_without_option_lines() {
        let questions = vec![MockTestQuestion {
            question: "Explain diffusion.".to_string(),
            options: Vec::new(),
            correct_answer: "Particles move from high to low concentration.".to_string(),
            explanation: "No membrane or energy is required.".to_string(),
        }];
        let text = render(&MaterialSet::MockTest(questions));
        assert!(!text.contains("A. "));
        assert!(text.contains("Correct answer: Particles move"));
    }

    #[test]
    fn filenames_match_material_kinds() {
        assert_eq!(suggested_filename(MaterialType::Flashcards), "flashcards.txt");
        assert_eq!(suggested_filename(MaterialType::Mcqs), "mcqs.txt");
        assert_eq!(suggested_filename(MaterialType::MockTest), "mock-test.txt");
    }
}
