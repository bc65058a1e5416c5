pub use advisor::Advisor;
pub use config::{Config, PrescriptionConfig};
pub use llm::{CompletionParams, CompletionProvider, LlmClient};
pub use redaction::redact_sensitive_text;
pub use session::{
    Gender, ResponsePool, Role, SessionState, Transcript, Turn, UserProfile, GREETING,
};

pub mod advisor;
pub mod config;
pub mod llm;
pub mod prompt;
pub mod redaction;
pub mod session;
