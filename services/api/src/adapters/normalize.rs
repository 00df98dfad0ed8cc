//! services/api/src/adapters/normalize.rs
//!
//! Turns raw agent reply text into validated domain records.
//!
//! Agents are asked for bare JSON but often wrap it in prose or markdown
//! fences, so parsing walks an ordered chain of strategies and the first one
//! that produces a JSON container wins. Whatever parses is then shape-checked
//! before it is allowed anywhere near a session. Agent text is data and only
//! ever data: a reply that defeats every strategy is an error for the caller
//! to absorb, never something to interpret or execute.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use study_assistant_core::domain::{
    Flashcard, MaterialSet, MaterialType, Mcq, MockTestQuestion,
};

/// Why normalization produced no usable records.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("no structured data found in the agent reply")]
    NoStructuredData,
    #[error("agent records failed validation: {0}")]
    MalformedRecord(String),
}

/// Normalizes one agent reply into a batch of `material` records.
///
/// An object reply missing the expected field (or a reply that parses to an
/// empty array) yields an empty batch, not an error; the caller decides what
/// an empty batch means.
pub fn normalize(material: MaterialType, raw: &str) -> Result<MaterialSet, NormalizeError> {
    let strategies: [fn(&str) -> Option<Value>; 3] =
        [parse_direct, parse_fenced_block, parse_lenient];

    for parse in strategies {
        if let Some(value) = parse(raw) {
            // Scalars are not record containers; let later strategies try.
            if value.is_array() || value.is_object() {
                let set = records_from_value(material, &value)?;
                set.validate()
                    .map_err(|e| NormalizeError::MalformedRecord(e.to_string()))?;
                return Ok(set);
            }
        }
    }

    // Structured parsing found nothing. Flashcards get one more,
    // line-oriented chance; the other kinds do not.
    if material == MaterialType::Flashcards {
        let cards = scan_labeled_lines(raw);
        if !cards.is_empty() {
            return Ok(MaterialSet::Flashcards(cards));
        }
    }

    Err(NormalizeError::NoStructuredData)
}

//=========================================================================================
// Parse Strategies
//=========================================================================================

/// Strategy 1: the whole reply is already JSON.
fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim()).ok()
}

/// Strategy 2: the JSON sits inside a markdown code fence.
fn parse_fenced_block(raw: &str) -> Option<Value> {
    let fence = Regex::new(r"```(?:json|JSON)?\s*([\[{][\s\S]*?[\]}])\s*```").unwrap();
    let captures = fence.captures(raw)?;
    serde_json::from_str(captures.get(1)?.as_str()).ok()
}

/// Strategy 3: lenient repair. Trims prose around the outermost bracket pair
/// and strips trailing commas, the two defects agents produce most often.
fn parse_lenient(raw: &str) -> Option<Value> {
    let start = raw.find(['[', '{'])?;
    let closer = if raw.as_bytes()[start] == b'[' { ']' } else { '}' };
    let end = raw.rfind(closer)?;
    if end <= start {
        return None;
    }
    let repaired = strip_trailing_commas(&raw[start..=end]);
    serde_json::from_str(&repaired).ok()
}

fn strip_trailing_commas(candidate: &str) -> String {
    let trailing_comma = Regex::new(r",\s*([\]}])").unwrap();
    trailing_comma.replace_all(candidate, "$1").into_owned()
}

/// Strategy 4, flashcards only: scan for `Question:` / `Answer:` labeled
/// lines and pair them up in order. A question with no answer before the
/// next question starts is dropped, as is an answer with no open question.
fn scan_labeled_lines(raw: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut pending_question: Option<String> = None;

    for line in raw.lines() {
        let line = line.trim();
        if let Some(question) = strip_label(line, "question:") {
            pending_question = Some(question.to_string());
        } else if let Some(answer) = strip_label(line, "answer:") {
            if let Some(question) = pending_question.take() {
                cards.push(Flashcard {
                    question,
                    answer: answer.to_string(),
                });
            }
        }
    }
    cards
}

/// Case-insensitive label match at the start of a line.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        Some(line[label.len()..].trim())
    } else {
        None
    }
}

//=========================================================================================
// Record Extraction and Shape Checks
//=========================================================================================

/// Raw wire shape of a flashcard record.
#[derive(Debug, Deserialize)]
struct RawFlashcard {
    question: String,
    answer: String,
}

impl RawFlashcard {
    fn to_domain(self) -> Flashcard {
        Flashcard {
            question: self.question,
            answer: self.answer,
        }
    }
}

/// Raw wire shape of a multiple-choice record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMcq {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
}

impl RawMcq {
    fn to_domain(self) -> Mcq {
        Mcq {
            question: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
        }
    }
}

/// Raw wire shape of a mock-test record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMockTestQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
}

impl RawMockTestQuestion {
    fn to_domain(self) -> MockTestQuestion {
        MockTestQuestion {
            question: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
        }
    }
}

/// Finds the record array inside a parsed value and deserializes it.
///
/// Accepts either a bare array or an object carrying the array under the
/// material's field name. An object without that field is an empty batch.
fn records_from_value(material: MaterialType, value: &Value) -> Result<MaterialSet, NormalizeError> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get(material.field_name()) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Ok(MaterialSet::empty(material)),
        },
        _ => return Ok(MaterialSet::empty(material)),
    };

    match material {
        MaterialType::Flashcards => {
            let records = collect::<RawFlashcard>(items)?;
            Ok(MaterialSet::Flashcards(
                records.into_iter().map(RawFlashcard::to_domain).collect(),
            ))
        }
        MaterialType::Mcqs => {
            let records = collect::<RawMcq>(items)?;
            Ok(MaterialSet::Mcqs(
                records.into_iter().map(RawMcq::to_domain).collect(),
            ))
        }
        MaterialType::MockTest => {
            let records = collect::<RawMockTestQuestion>(items)?;
            Ok(MaterialSet::MockTest(
                records
                    .into_iter()
                    .map(RawMockTestQuestion::to_domain)
                    .collect(),
            ))
        }
    }
}

fn collect<T: serde::de::DeserializeOwned>(items: &[Value]) -> Result<Vec<T>, NormalizeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item.clone())
                .map_err(|e| NormalizeError::MalformedRecord(format!("record {index}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLASHCARD_JSON: &str =
        r#"[{"question": "What is ATP?", "answer": "The cell's energy currency."}]"#;

    fn flashcards(set: MaterialSet) -> Vec<Flashcard> {
        match set {
            MaterialSet::Flashcards(cards) => cards,
            other => panic!("expected flashcards, got {other:?}"),
        }
    }

    #[test]
    fn bare_json_array_parses_directly() {
        let set = normalize(MaterialType::Flashcards, FLASHCARD_JSON).unwrap();
        let cards = flashcards(set);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is ATP?");
    }

    #[test]
    fn fenced_json_block_is_extracted() {
        let raw = format!("Here you go!\n```json\n{FLASHCARD_JSON}\n```\nGood luck!");
        let cards = flashcards(normalize(MaterialType::Flashcards, &raw).unwrap());
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn unlabeled_fence_is_extracted_too() {
        let raw = format!("```\n{FLASHCARD_JSON}\n```");
        let cards = flashcards(normalize(MaterialType::Flashcards, &raw).unwrap());
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn prose_around_brackets_is_trimmed() {
        let raw = format!("Sure! Here are your cards: {FLASHCARD_JSON} Hope that helps.");
        let cards = flashcards(normalize(MaterialType::Flashcards, &raw).unwrap());
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn trailing_commas_are_repaired() {
        let raw = r#"[{"question": "Q", "answer": "A",},]"#;
        let cards = flashcards(normalize(MaterialType::Flashcards, raw).unwrap());
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn object_wrapper_with_expected_field_is_unwrapped() {
        let raw = format!(r#"{{"flashcards": {FLASHCARD_JSON}}}"#);
        let cards = flashcards(normalize(MaterialType::Flashcards, &raw).unwrap());
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn object_wrapper_without_expected_field_yields_empty_batch() {
        let raw = r#"{"mcqs": []}"#;
        let set = normalize(MaterialType::Flashcards, raw).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn labeled_lines_rescue_flashcards_only() {
        let raw = "question: What is osmosis?\nANSWER: Water diffusion across a membrane.\n\
                   Question: orphaned\nQuestion: What is ATP?\nAnswer: Energy currency.";
        let cards = flashcards(normalize(MaterialType::Flashcards, raw).unwrap());
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].question, "What is ATP?");

        assert!(matches!(
            normalize(MaterialType::Mcqs, "Question: q\nAnswer: a"),
            Err(NormalizeError::NoStructuredData)
        ));
    }

    #[test]
    fn a_single_labeled_pair_becomes_one_card() {
        let cards = flashcards(
            normalize(MaterialType::Flashcards, "Question: What is X?\nAnswer: Y\n").unwrap(),
        );
        assert_eq!(
            cards,
            vec![Flashcard {
                question: "What is X?".to_string(),
                answer: "Y".to_string(),
            }]
        );
    }

    #[test]
    fn pure_prose_is_an_error() {
        assert!(matches!(
            normalize(MaterialType::MockTest, "I cannot help with that."),
            Err(NormalizeError::NoStructuredData)
        ));
    }

    #[test]
    fn record_missing_a_required_field_is_malformed() {
        let raw = r#"[{"question": "Q only"}]"#;
        assert!(matches!(
            normalize(MaterialType::Flashcards, raw),
            Err(NormalizeError::MalformedRecord(_))
        ));
    }

    #[test]
    fn mcq_with_answer_outside_options_is_malformed() {
        let raw = r#"[{"question": "Q", "options": ["a", "b", "c", "d"], "correctAnswer": "e"}]"#;
        assert!(matches!(
            normalize(MaterialType::Mcqs, raw),
            Err(NormalizeError::MalformedRecord(_))
        ));
    }

    #[test]
    fn mcqs_use_the_camel_case_answer_field() {
        let raw = r#"[{"question": "Pick b", "options": ["a", "b", "c", "d"], "correctAnswer": "b"}]"#;
        let set = normalize(MaterialType::Mcqs, raw).unwrap();
        match set {
            MaterialSet::Mcqs(mcqs) => assert_eq!(mcqs[0].correct_answer, "b"),
            other => panic!("expected mcqs, got {other:?}"),
        }
    }

    #[test]
    fn mock_test_explanation_defaults_to_empty_but_answer_is_required() {
        let with_defaults =
            r#"[{"question": "Q", "correctAnswer": "A"}]"#;
        let set = normalize(MaterialType::MockTest, with_defaults).unwrap();
        match set {
            MaterialSet::MockTest(questions) => {
                assert!(questions[0].options.is_empty());
                assert!(questions[0].explanation.is_empty());
            }
            other => panic!("expected mock test, got {other:?}"),
        }

        let missing_answer = r#"[{"question": "Q", "explanation": "E"}]"#;
        assert!(matches!(
            normalize(MaterialType::MockTest, missing_answer),
            Err(NormalizeError::MalformedRecord(_))
        ));
    }

    #[test]
    fn empty_array_reply_is_an_empty_batch_not_an_error() {
        let set = normalize(MaterialType::Mcqs, "[]").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn code_reply_is_never_evaluated_just_rejected() {
        // A hostile agent returning JavaScript must land in the error path.
        let raw = "const pwn = () => fetch('https://evil.example'); pwn();";
        assert!(matches!(
            normalize(MaterialType::Flashcards, raw),
            Err(NormalizeError::NoStructuredData)
        ));
    }
}
