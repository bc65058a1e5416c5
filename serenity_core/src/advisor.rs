use crate::llm::{CompletionParams, CompletionProvider};
use crate::prompt::{advice_prompt, chat_prompt};
use crate::session::{SessionState, UserProfile};
use anyhow::Result;
use std::sync::Arc;

/// Drives the conversation: owns the provider handle and applies the
/// transcript/pool bookkeeping rules around each call.
pub struct Advisor {
    client: Arc<dyn CompletionProvider>,
}

impl Advisor {
    pub fn new(client: Arc<dyn CompletionProvider>) -> Self {
        Self { client }
    }

    /// Sends one chat turn. An empty or whitespace-only message is a
    /// no-op: nothing is appended and no request goes out. The user turn
    /// is appended before the provider call and stays appended even when
    /// the call fails; there is no rollback.
    pub async fn send_message(
        &self,
        session: &mut SessionState,
        profile: &UserProfile,
        message: &str,
    ) -> Result<Option<String>> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(None);
        }

        session.transcript.push_user(message);
        let prompt = chat_prompt(profile, &session.transcript);

        let reply = self
            .client
            .complete(&prompt, CompletionParams::chat())
            .await?;

        session.transcript.push_assistant(&reply);
        session.response_pool.push(&reply);
        Ok(Some(reply))
    }

    /// One stateless summary request over the pooled responses. Touches
    /// neither the transcript nor the pool; returns None when nothing has
    /// been pooled yet.
    pub async fn collective_advice(&self, session: &SessionState) -> Result<Option<String>> {
        if session.response_pool.is_empty() {
            return Ok(None);
        }

        let prompt = advice_prompt(&session.response_pool);
        let advice = self
            .client
            .complete(&prompt, CompletionParams::advice())
            .await?;
        Ok(Some(advice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Gender, Role};
    use anyhow::anyhow;
    use std::sync::Mutex;

    struct MockProvider {
        reply: Result<String, String>,
        prompts: Mutex<Vec<(String, CompletionParams)>>,
    }

    impl MockProvider {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<(String, CompletionParams)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), params));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(anyhow!("{}", message)),
            }
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            age: Some(29),
            gender: Some(Gender::Female),
            nationality: "Portuguese".to_string(),
            preferences: "sleep".to_string(),
        }
    }

    #[tokio::test]
    async fn n_sends_yield_2n_plus_1_turns_and_n_pool_entries() {
        let provider = MockProvider::replying("take a breath");
        let advisor = Advisor::new(provider.clone());
        let mut session = SessionState::new();

        for i in 0..3 {
            let reply = advisor
                .send_message(&mut session, &profile(), &format!("message {}", i))
                .await
                .unwrap();
            assert_eq!(reply.as_deref(), Some("take a breath"));
        }

        assert_eq!(session.transcript.len(), 7);
        assert_eq!(session.response_pool.len(), 3);
        assert_eq!(provider.recorded().len(), 3);
    }

    #[tokio::test]
    async fn empty_message_sends_nothing_and_appends_nothing() {
        let provider = MockProvider::replying("unused");
        let advisor = Advisor::new(provider.clone());
        let mut session = SessionState::new();

        let reply = advisor
            .send_message(&mut session, &profile(), "   \t ")
            .await
            .unwrap();

        assert!(reply.is_none());
        assert_eq!(session.transcript.len(), 1);
        assert!(session.response_pool.is_empty());
        assert!(provider.recorded().is_empty());
    }

    #[tokio::test]
    async fn failed_send_keeps_the_user_turn() {
        let advisor = Advisor::new(MockProvider::failing("network down"));
        let mut session = SessionState::new();

        let err = advisor
            .send_message(&mut session, &profile(), "hello")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("network down"));

        // Greeting plus the appended user turn, no assistant turn.
        assert_eq!(session.transcript.len(), 2);
        let last = session.transcript.turns().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "hello");
        assert!(session.response_pool.is_empty());
    }

    #[tokio::test]
    async fn send_uses_chat_params_and_embeds_profile() {
        let provider = MockProvider::replying("ok");
        let advisor = Advisor::new(provider.clone());
        let mut session = SessionState::new();

        advisor
            .send_message(&mut session, &profile(), "hi")
            .await
            .unwrap();

        let recorded = provider.recorded();
        let (prompt, params) = &recorded[0];
        assert_eq!(*params, CompletionParams::chat());
        assert!(prompt.contains("Name: Ana"));
        assert!(prompt.contains("User: hi"));
    }

    #[tokio::test]
    async fn advice_on_empty_pool_is_a_no_op() {
        let provider = MockProvider::replying("unused");
        let advisor = Advisor::new(provider.clone());
        let session = SessionState::new();

        let advice = advisor.collective_advice(&session).await.unwrap();
        assert!(advice.is_none());
        assert!(provider.recorded().is_empty());
    }

    #[tokio::test]
    async fn advice_joins_pool_and_leaves_state_alone() {
        let provider = MockProvider::replying("rest, hydrate, breathe");
        let advisor = Advisor::new(provider.clone());
        let mut session = SessionState::new();
        session.response_pool.push("Sleep earlier.");
        session.response_pool.push("Walk daily.");

        let advice = advisor.collective_advice(&session).await.unwrap();
        assert_eq!(advice.as_deref(), Some("rest, hydrate, breathe"));

        let recorded = provider.recorded();
        let (prompt, params) = &recorded[0];
        assert_eq!(*params, CompletionParams::advice());
        assert!(prompt.contains("Sleep earlier.\nWalk daily."));

        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.response_pool.len(), 2);
    }
}
