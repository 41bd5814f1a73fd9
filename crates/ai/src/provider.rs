//! Draft providers: the chat-completions backend behind email generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::EmailContext;
use crate::draft::{EmailDraft, parse_draft};

/// OpenAI-compatible chat-completions endpoint.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

const DEFAULT_MODEL: &str = "gpt-4o";

/// Errors from draft generation.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// A backend that turns a prompt into raw model text.
#[async_trait]
pub trait DraftProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

/// Generate and strictly parse a customer email draft.
pub async fn generate_email_draft(
    provider: &dyn DraftProvider,
    ctx: &EmailContext,
) -> Result<EmailDraft, AiError> {
    let raw = provider.complete(&ctx.prompt()).await?;
    parse_draft(&raw)
}

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

impl OpenAiConfig {
    /// Read `OPENAI_API_KEY` (required) and `OPENAI_MODEL` (optional) from the
    /// environment, honoring a local `.env` if present.
    pub fn from_env() -> Result<Self, AiError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AiError::NotConfigured("OPENAI_API_KEY is not set".to_string())
        })?;
        let model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self { api_key, model })
    }
}

/// Chat-completions draft provider.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::NotConfigured(format!("http client: {e}")))?;
        Ok(Self { config, client })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{OPENAI_API_BASE}/{method}")
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl DraftProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 500,
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "requesting email draft"
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api(format!("status {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(format!("response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::InvalidResponse("no completion content".to_string()))
    }
}

/// Canned provider for tests and offline development.
pub struct MockProvider {
    reply: Option<String>,
}

impl MockProvider {
    /// Always answer with the given raw text.
    pub fn replying(raw: impl Into<String>) -> Self {
        Self {
            reply: Some(raw.into()),
        }
    }

    /// Always fail, simulating an unreachable backend.
    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl DraftProvider for MockProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
        match &self.reply {
            Some(raw) => Ok(raw.clone()),
            None => Err(AiError::Api("mock provider failure".to_string())),
        }
    }
}
