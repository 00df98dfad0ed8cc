//! crates/study_assistant_core/src/ports.rs
//!
//! Service contracts for the two remote collaborators: the study-material
//! agent and the tutor agent. The web layer depends on these traits, never
//! on the HTTP client behind them, so tests can script the agents.

use crate::domain::{MaterialSet, MaterialType};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// What a port call can fail with, stripped of transport specifics.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Not found: {0}")]
    NotFound(String),
    /// The remote call itself failed: transport error or a non-success status.
    #[error("Upstream agent call failed: {0}")]
    Upstream(String),
    /// The agent answered, but the reply could not be turned into usable records.
    #[error("Agent reply was unusable: {0}")]
    Malformed(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Turns raw study notes into one batch of typed study material.
///
/// Implementations make exactly one upstream attempt per call. Falling back
/// to demo material on failure is the caller's decision, not the port's.
#[async_trait]
pub trait StudyMaterialService: Send + Sync {
    async fn generate(&self, notes: &str, material: MaterialType) -> PortResult<MaterialSet>;
}

/// Answers a free-text student question against the notes they are studying.
#[async_trait]
pub trait TutorService: Send + Sync {
    async fn reply(&self, notes: &str, question: &str) -> PortResult<String>;
}
