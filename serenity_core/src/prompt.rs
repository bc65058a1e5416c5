use crate::session::{ResponsePool, Role, Transcript, UserProfile};

/// Builds the single system message sent on every chat turn: the full
/// profile followed by a flattened, role-labelled view of the transcript.
pub fn chat_prompt(profile: &UserProfile, transcript: &Transcript) -> String {
    let age = profile
        .age
        .map(|a| a.to_string())
        .unwrap_or_default();
    let gender = profile
        .gender
        .map(|g| g.display_name().to_string())
        .unwrap_or_default();

    format!(
        "User Details:\n\
         Name: {}\n\
         Age: {}\n\
         Gender: {}\n\
         Nationality: {}\n\
         Preferences: {}\n\n\
         Chatbot Interaction:\n{}",
        profile.name.trim(),
        age,
        gender,
        profile.nationality.trim(),
        profile.preferences.trim(),
        flatten_transcript(transcript),
    )
}

/// Stateless summary request over every pooled assistant response.
pub fn advice_prompt(pool: &ResponsePool) -> String {
    format!(
        "You are a helpful assistant. The following are multiple responses you've given:\n\n\
         {}\n\n\
         Please summarize these and give a collective, empathetic piece of advice \
         on how to overcome the user's challenges.",
        pool.entries().join("\n")
    )
}

fn flatten_transcript(transcript: &Transcript) -> String {
    transcript
        .turns()
        .iter()
        .map(|turn| format!("{}: {}", role_label(turn.role), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
    }
}
