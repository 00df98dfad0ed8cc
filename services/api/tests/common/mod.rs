use api_lib::config::Config;
use api_lib::web::{
    router,
    state::{AppState, SessionRegistry},
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use study_assistant_core::domain::{MaterialSet, MaterialType};
use study_assistant_core::ports::{PortError, PortResult, StudyMaterialService, TutorService};
use tower::ServiceExt;
use uuid::Uuid;

/// Scripted stand-in for the study agent: replies with a fixed batch, or
/// fails like an unreachable endpoint when given `None`.
pub struct StubStudy(pub Option<MaterialSet>);

#[async_trait]
impl StudyMaterialService for StubStudy {
    async fn generate(&self, _notes: &str, material: MaterialType) -> PortResult<MaterialSet> {
        match &self.0 {
            Some(set) => Ok(set.clone()),
            None => Err(PortError::Upstream(format!(
                "scripted failure generating {}",
                material.display_name()
            ))),
        }
    }
}

/// Scripted stand-in for the tutor agent.
pub struct StubTutor(pub Option<String>);

#[async_trait]
impl TutorService for StubTutor {
    async fn reply(&self, _notes: &str, _question: &str) -> PortResult<String> {
        match &self.0 {
            Some(text) => Ok(text.clone()),
            None => Err(PortError::Upstream("scripted tutor failure".to_string())),
        }
    }
}

/// Builds the real router around scripted agent adapters. No network, no
/// environment variables.
pub fn create_test_app(study: StubStudy, tutor: StubTutor) -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: tracing::Level::DEBUG,
        agent_endpoint: "http://agent.invalid/invoke".to_string(),
        agent_api_key: "test-key".to_string(),
        study_agent_id: "study-agent-test".to_string(),
        tutor_agent_id: "tutor-agent-test".to_string(),
        cors_allowed_origin: "http://localhost:3000".to_string(),
    };

    router(Arc::new(AppState {
        config: Arc::new(config),
        study_adapter: Arc::new(study),
        tutor_adapter: Arc::new(tutor),
        sessions: SessionRegistry::new(),
    }))
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// POST /sessions and return the new session's ID.
pub async fn create_session(app: &Router) -> Uuid {
    let response = post_empty(app, "/sessions").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["sessionId"].as_str().unwrap().parse().unwrap()
}

/// PUT notes into a session, replacing whatever is there.
pub async fn put_notes(app: &Router, session_id: Uuid, text: &str) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/sessions/{session_id}/notes"))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "text": text }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
