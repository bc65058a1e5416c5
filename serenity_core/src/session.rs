use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// The assistant turn every session opens with.
pub const GREETING: &str = "Hello! I'm here to listen and help you find balance and peace.";

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Mindful Companion",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Ordered message history for one session. Append-only: turns are never
/// edited or removed while the session lives.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn with_greeting() -> Self {
        let mut transcript = Self::default();
        transcript.push(Role::Assistant, GREETING);
        transcript
    }

    pub fn push(&mut self, role: Role, content: &str) {
        self.turns.push(Turn {
            role,
            content: content.to_string(),
        });
    }

    pub fn push_user(&mut self, content: &str) {
        self.push(Role::User, content);
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.push(Role::Assistant, content);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Every assistant reply ever produced in the session, in order. Feeds the
/// collective-advice summary and the prescription body; grows only.
#[derive(Debug, Clone, Default)]
pub struct ResponsePool {
    entries: Vec<String>,
}

impl ResponsePool {
    pub fn push(&mut self, response: &str) {
        self.entries.push(response.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Single block of text for the prescription body.
    pub fn joined(&self) -> String {
        self.entries.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn display_name(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Profile fields as read from the input widgets at the moment of an
/// action; nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub nationality: String,
    pub preferences: String,
}

impl UserProfile {
    /// Name, age and gender must be present before a prescription can be
    /// generated; callers check this before touching the template file.
    pub fn validate_for_prescription(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Name");
        }
        match self.age {
            Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => {}
            _ => missing.push("Age (1-120)"),
        }
        if self.gender.is_none() {
            missing.push("Gender");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            bail!(
                "Please provide your {} to generate the prescription.",
                missing.join(", ")
            );
        }
    }

    /// Name line for the prescription, with the title the template expects.
    pub fn formatted_name(&self) -> String {
        let name = self.name.trim();
        match self.gender {
            Some(Gender::Male) => format!("Mr. {}", name),
            Some(Gender::Female) => format!("Miss. {}", name),
            _ => name.to_string(),
        }
    }
}

/// Mutable state for one session. Built once at startup, handed by
/// reference into each action handler, never shared across sessions.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub transcript: Transcript,
    pub response_pool: ResponsePool,
    pub prescription_generated: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::with_greeting(),
            response_pool: ResponsePool::default(),
            prescription_generated: false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_opens_with_assistant_greeting() {
        let transcript = Transcript::with_greeting();
        assert_eq!(transcript.len(), 1);
        let first = &transcript.turns()[0];
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.content, GREETING);
    }

    #[test]
    fn transcript_appends_in_order() {
        let mut transcript = Transcript::with_greeting();
        transcript.push_user("I feel restless");
        transcript.push_assistant("Tell me more");
        let roles: Vec<Role> = transcript.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
    }

    #[test]
    fn response_pool_joins_with_single_spaces() {
        let mut pool = ResponsePool::default();
        pool.push("Rest more.");
        pool.push("Drink water.");
        assert_eq!(pool.joined(), "Rest more. Drink water.");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn validation_rejects_missing_name() {
        let profile = UserProfile {
            age: Some(30),
            gender: Some(Gender::Other),
            ..Default::default()
        };
        let err = profile.validate_for_prescription().unwrap_err();
        assert!(err.to_string().contains("Name"));
    }

    #[test]
    fn validation_rejects_out_of_range_age() {
        let profile = UserProfile {
            name: "Ana".to_string(),
            age: Some(121),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        let err = profile.validate_for_prescription().unwrap_err();
        assert!(err.to_string().contains("Age"));
    }

    #[test]
    fn validation_accepts_complete_profile() {
        let profile = UserProfile {
            name: "Ana".to_string(),
            age: Some(29),
            gender: Some(Gender::Female),
            nationality: "Portuguese".to_string(),
            preferences: "sleep, focus".to_string(),
        };
        assert!(profile.validate_for_prescription().is_ok());
    }

    #[test]
    fn formatted_name_applies_title_by_gender() {
        let mut profile = UserProfile {
            name: " Silva ".to_string(),
            ..Default::default()
        };
        profile.gender = Some(Gender::Male);
        assert_eq!(profile.formatted_name(), "Mr. Silva");
        profile.gender = Some(Gender::Female);
        assert_eq!(profile.formatted_name(), "Miss. Silva");
        profile.gender = Some(Gender::Other);
        assert_eq!(profile.formatted_name(), "Silva");
        profile.gender = None;
        assert_eq!(profile.formatted_name(), "Silva");
    }

    #[test]
    fn fresh_session_has_no_pool_and_unset_flag() {
        let session = SessionState::new();
        assert_eq!(session.transcript.len(), 1);
        assert!(session.response_pool.is_empty());
        assert!(!session.prescription_generated);
    }
}
