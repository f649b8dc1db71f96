//! LLM client: the single point of entry for all completion calls in JobJockey.
//!
//! No other module talks to the provider directly. Handlers and the analysis
//! pipeline depend on the `CompletionModel` trait; `LlmClient` is the
//! production implementation against Groq's OpenAI-compatible endpoint.
//!
//! One prompt in, one completion out: no streaming, no conversation memory,
//! no retries.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for every completion.
pub const MODEL: &str = "llama3-8b-8192";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a filled prompt into a completion.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Explicit model configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Returns the text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Chat-completions client shared by all requests.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends `prompt` as a single user message and returns the full response object.
    pub async fn call(&self, prompt: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(body),
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Unwraps `{"error":{"message":..}}` bodies; anything else is returned as-is.
fn provider_error_message(body: String) -> String {
    serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Test double that returns a canned completion and records every prompt.
#[cfg(test)]
pub(crate) struct MockModel {
    reply: String,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockModel {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CompletionModel for MockModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Test double whose every call fails like an unreachable provider.
#[cfg(test)]
pub(crate) struct FailingModel;

#[cfg(test)]
#[async_trait]
impl CompletionModel for FailingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 401,
            message: "Invalid API Key".to_string(),
        })
    }
}
