//! services/api/src/adapters/agent.rs
//!
//! This module contains the HTTP client for the hosted agent platform and
//! the two adapters built on it: one implements the `StudyMaterialService`
//! port, the other the `TutorService` port.

const STUDY_PROMPT_TEMPLATE: &str = r#"You are a study assistant. A student has shared their notes with you.

STUDENT NOTES:
---
{notes}
---

{requirements}

Return ONLY the JSON described above. Do not wrap it in markdown fences and do not add any commentary before or after it."#;

const TUTOR_PROMPT_TEMPLATE: &str = r#"You are a patient tutor helping a student understand their study notes.

STUDENT NOTES:
---
{notes}
---

STUDENT QUESTION:
{question}

Answer the question clearly and conversationally, grounding your answer in the notes where they help. If the notes do not cover the question, say so and answer from general knowledge. Reply in plain prose, not JSON."#;

use crate::adapters::normalize;
use async_trait::async_trait;
use serde::Serialize;
use study_assistant_core::domain::{MaterialSet, MaterialType};
use study_assistant_core::ports::{PortError, PortResult, StudyMaterialService, TutorService};
use uuid::Uuid;

/// Response fields checked, in order, for the agent's reply text.
const REPLY_FIELDS: [&str; 3] = ["response", "message", "content"];

/// Tutor calls include at most this many characters of notes as context, so
/// huge pasted documents do not blow up the request.
const NOTES_CONTEXT_LIMIT: usize = 6000;

//=========================================================================================
// The Agent HTTP Client
//=========================================================================================

/// The JSON body the agent endpoint accepts.
#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    user_id: String,
    agent_id: &'a str,
    session_id: String,
    message: &'a str,
}

/// A thin client for the hosted agent endpoint.
///
/// Each user action maps to exactly one POST: no retry, no backoff, and no
/// client-side timeout beyond the transport's own defaults. The API key is
/// attached here, server-side, on every request.
#[derive(Clone)]
pub struct AgentClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AgentClient {
    /// Creates a new `AgentClient` for the given endpoint and key.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Sends one message to the given agent and returns its reply text.
    ///
    /// The platform issues no stable identities for this app, so each call
    /// carries fresh ones. The agent treats every request as a new
    /// conversation, which is exactly what stateless generation wants.
    pub async fn send(&self, agent_id: &str, message: &str) -> PortResult<String> {
        let body = AgentRequest {
            user_id: format!("user-{}", Uuid::new_v4()),
            agent_id,
            session_id: format!("session-{}", Uuid::new_v4()),
            message,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PortError::Upstream(format!(
                "agent endpoint returned {status}: {detail}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PortError::Malformed(format!("agent reply was not JSON: {e}")))?;

        extract_reply_text(&payload)
    }
}

/// Picks the first non-empty string among the reply fields the platform is
/// known to use.
fn extract_reply_text(payload: &serde_json::Value) -> PortResult<String> {
    for field in REPLY_FIELDS {
        if let Some(text) = payload.get(field).and_then(|value| value.as_str()) {
            if !text.trim().is_empty() {
                return Ok(text.to_string());
            }
        }
    }
    Err(PortError::Malformed(format!(
        "agent reply carried none of the expected fields ({})",
        REPLY_FIELDS.join(", ")
    )))
}

/// Builds the per-material generation instruction.
fn study_prompt(notes: &str, material: MaterialType) -> String {
    let requirements = match material {
        MaterialType::Flashcards => format!(
            "Create exactly {count} flashcards covering the most important points in the notes. \
             Respond with a JSON array of objects, each with the string fields \"question\" and \
             \"answer\".",
            count = material.target_count()
        ),
        MaterialType::Mcqs => format!(
            "Create exactly {count} multiple-choice questions testing the notes. Respond with a \
             JSON array of objects, each with a string field \"question\", a field \"options\" \
             holding exactly 4 distinct answer strings, and a string field \"correctAnswer\" \
             whose value is one of the options.",
            count = material.target_count()
        ),
        MaterialType::MockTest => format!(
            "Create a mock test of exactly {count} questions from the notes, mixing open-answer, \
             true/false, and multiple-choice styles. Respond with a JSON array of objects, each \
             with string fields \"question\", \"correctAnswer\" and \"explanation\", plus a field \
             \"options\" holding the answer choices (an empty array for open-answer questions).",
            count = material.target_count()
        ),
    };
    STUDY_PROMPT_TEMPLATE
        .replace("{notes}", notes)
        .replace("{requirements}", &requirements)
}

/// Truncates notes for use as tutor context.
fn notes_context(notes: &str) -> String {
    notes.chars().take(NOTES_CONTEXT_LIMIT).collect()
}

//=========================================================================================
// `StudyMaterialService` Adapter
//=========================================================================================

/// Generates study material by prompting a hosted agent and normalizing
/// whatever text comes back into validated records.
#[derive(Clone)]
pub struct AgentStudyAdapter {
    client: AgentClient,
    agent_id: String,
}

impl AgentStudyAdapter {
    pub fn new(client: AgentClient, agent_id: String) -> Self {
        Self { client, agent_id }
    }
}

#[async_trait]
impl StudyMaterialService for AgentStudyAdapter {
    async fn generate(&self, notes: &str, material: MaterialType) -> PortResult<MaterialSet> {
        let message = study_prompt(notes, material);
        let reply = self.client.send(&self.agent_id, &message).await?;
        tracing::debug!(
            material = material.display_name(),
            reply_chars = reply.len(),
            "Agent replied to generation request"
        );
        normalize::normalize(material, &reply).map_err(|e| PortError::Malformed(e.to_string()))
    }
}

//=========================================================================================
// `TutorService` Adapter
//=========================================================================================

/// Answers student questions by prompting a hosted tutor agent with the
/// question plus a bounded slice of their notes.
#[derive(Clone)]
pub struct AgentTutorAdapter {
    client: AgentClient,
    agent_id: String,
}

impl AgentTutorAdapter {
    pub fn new(client: AgentClient, agent_id: String) -> Self {
        Self { client, agent_id }
    }
}

#[async_trait]
impl TutorService for AgentTutorAdapter {
    async fn reply(&self, notes: &str, question: &str) -> PortResult<String> {
        let message = TUTOR_PROMPT_TEMPLATE
            .replace("{notes}", &notes_context(notes))
            .replace("{question}", question);
        let reply = self.client.send(&self.agent_id, &message).await?;
        Ok(reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_extraction_prefers_response_over_the_other_fields() {
        let payload = json!({"response": "first", "message": "second", "content": "third"});
        assert_eq!(extract_reply_text(&payload).unwrap(), "first");
    }

    #[test]
    fn reply_extraction_skips_empty_fields() {
        let payload = json!({"response": "   ", "message": "", "content": "kept"});
        assert_eq!(extract_reply_text(&payload).unwrap(), "kept");
    }

    #[test]
    fn reply_extraction_fails_when_no_field_matches() {
        let payload = json!({"status": "ok"});
        assert!(matches!(
            extract_reply_text(&payload),
            Err(PortError::Malformed(_))
        ));
    }

    #[test]
    fn reply_extraction_ignores_non_string_fields() {
        let payload = json!({"response": 42, "message": "text"});
        assert_eq!(extract_reply_text(&payload).unwrap(), "text");
    }

    #[test]
    fn study_prompt_embeds_notes_count_and_field_names() {
        let prompt = study_prompt("Mitochondria produce ATP.", MaterialType::Mcqs);
        assert!(prompt.contains("Mitochondria produce ATP."));
        assert!(prompt.contains("exactly 8 multiple-choice questions"));
        assert!(prompt.contains("\"correctAnswer\""));
    }

    #[test]
    fn mock_test_prompt_asks_for_explanations() {
        let prompt = study_prompt("notes", MaterialType::MockTest);
        assert!(prompt.contains("exactly 10 questions"));
        assert!(prompt.contains("\"explanation\""));
    }

    #[test]
    fn tutor_context_is_bounded() {
        let notes = "x".repeat(NOTES_CONTEXT_LIMIT + 500);
        assert_eq!(notes_context(&notes).chars().count(), NOTES_CONTEXT_LIMIT);
    }
}
