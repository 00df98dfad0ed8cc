pub mod agent;
pub mod normalize;

pub use agent::{AgentClient, AgentStudyAdapter, AgentTutorAdapter};
