pub mod domain;
pub mod export;
pub mod fallback;
pub mod ports;
pub mod session;

pub use domain::{
    ChatMessage, Flashcard, MalformedRecord, MaterialSet, MaterialType, Mcq, MockTestQuestion,
    Role,
};
pub use ports::{PortError, PortResult, StudyMaterialService, TutorService};
pub use session::{AnswerResult, Direction, SessionOpError, StudySession};
