use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

const CHAT_MAX_TOKENS: u32 = 150;
const ADVICE_MAX_TOKENS: u32 = 200;

/// Fixed sampling parameters; the two call sites differ only in the
/// output-token budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl CompletionParams {
    /// Per-message chat replies.
    pub fn chat() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: CHAT_MAX_TOKENS,
            top_p: 1.0,
        }
    }

    /// The collective-advice summary.
    pub fn advice() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: ADVICE_MAX_TOKENS,
            top_p: 1.0,
        }
    }
}

/// Seam between the orchestration layer and the hosted completion API, so
/// tests can run against a canned provider instead of the network.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

/// OpenAI-compatible chat-completion client. One request per call, no
/// retry, no caching; timeouts are whatever reqwest defaults to.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Self {
            http_client: Client::new(),
            api_key: api_key.and_then(clean_optional),
            base_url: if base_url.is_empty() {
                GROQ_BASE_URL.to_string()
            } else {
                base_url
            },
            model: model.trim().to_string(),
        }
    }

    async fn chat_completion(&self, prompt: &str, params: CompletionParams) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        // The whole prompt travels as a single system-role message.
        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: prompt.to_string(),
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            stream: false,
            stop: None,
        };

        let mut request = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }
        let response = request.json(&request_body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = %status, model = %self.model, "completion request failed");
            return Err(anyhow!(
                "LLM API Error (Status {}): {}",
                status,
                truncate_error(&text)
            ));
        }

        let chat_response: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse LLM response: {} | Raw response: {}",
                e,
                text
            )
        })?;

        let first_choice = chat_response
            .choices
            .first()
            .ok_or_else(|| anyhow!("No choices returned from LLM"))?;

        match &first_choice.message {
            Some(msg) if !msg.content.trim().is_empty() => {
                tracing::debug!(chars = msg.content.len(), model = %self.model, "completion ok");
                Ok(msg.content.clone())
            }
            Some(_) => Err(anyhow!(
                "LLM returned empty content. Choice details: {:?}",
                first_choice
            )),
            None => match first_choice.finish_reason.as_deref() {
                Some(reason) => Err(anyhow!("LLM stopped execution. Reason: {}", reason)),
                None => Err(anyhow!(
                    "No content or reason in LLM response. Choice node: {:?}",
                    first_choice
                )),
            },
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for LlmClient {
    async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<String> {
        self.chat_completion(prompt, params).await
    }
}

fn truncate_error(text: &str) -> String {
    const MAX: usize = 320;
    if text.len() <= MAX {
        return text.to_string();
    }
    // Error bodies can be arbitrary UTF-8; never cut inside a character.
    let mut end = MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

fn clean_optional(input: String) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_and_advice_presets_differ_only_in_token_budget() {
        let chat = CompletionParams::chat();
        let advice = CompletionParams::advice();
        assert_eq!(chat.temperature, advice.temperature);
        assert_eq!(chat.top_p, advice.top_p);
        assert_eq!(chat.max_tokens, 150);
        assert_eq!(advice.max_tokens, 200);
    }

    #[test]
    fn request_body_carries_fixed_sampling_fields() {
        let body = ChatRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: "prompt".to_string(),
            }],
            temperature: 1.0,
            max_tokens: 150,
            top_p: 1.0,
            stream: false,
            stop: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["temperature"], 1.0);
        assert_eq!(value["max_tokens"], 150);
        assert_eq!(value["top_p"], 1.0);
        assert_eq!(value["stream"], false);
        // Absent stop sequences stay out of the payload entirely.
        assert!(value.get("stop").is_none());
    }

    #[test]
    fn response_parsing_reads_first_choice_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"breathe"},"finish_reason":"stop"}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let first = parsed.choices.first().unwrap();
        assert_eq!(first.message.as_ref().unwrap().content, "breathe");
    }

    #[test]
    fn client_normalizes_base_url_and_key() {
        let client = LlmClient::new(
            Some("  ".to_string()),
            format!("{}/", GROQ_BASE_URL),
            DEFAULT_MODEL.to_string(),
        );
        assert_eq!(client.base_url, GROQ_BASE_URL);
        assert!(client.api_key.is_none());

        let client = LlmClient::new(None, "".to_string(), DEFAULT_MODEL.to_string());
        assert_eq!(client.base_url, GROQ_BASE_URL);
    }

    #[test]
    fn truncate_error_bounds_long_bodies() {
        let long = "x".repeat(1000);
        let out = truncate_error(&long);
        assert!(out.len() < 340);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_error("short"), "short");

        // A multi-byte character straddling the cut point must not panic;
        // the cut backs off to the previous character boundary.
        let mut straddling = "x".repeat(319);
        straddling.push('é');
        straddling.push_str(&"x".repeat(100));
        let out = truncate_error(&straddling);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 323);

        let all_multibyte = "é".repeat(400);
        let out = truncate_error(&all_multibyte);
        assert!(out.ends_with("..."));
        assert!(out.len() < 340);
    }
}
