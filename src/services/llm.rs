//! LLM service for classroom recommendations
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. One request per
//! call, no retries; failures are reported to the caller as-is.

use super::TextGenerator;
use crate::error::{AulaSenseError, Result};
use crate::insights::prompt::SYSTEM_PROMPT;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default model when OPENAI_MODEL is not set
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for LLM service
#[derive(Debug)]
pub struct LlmConfig {
    /// OpenAI API key
    pub api_key: SecretString,

    /// Model to use (default: gpt-4o-mini)
    pub model: String,

    /// API root, overridable for compatible gateways
    pub base_url: String,

    /// Max tokens for responses
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl LlmConfig {
    /// Config with the recommendation defaults for the given key
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 700,
            temperature: 0.25,
        }
    }
}

/// LLM service backed by the chat-completions API
pub struct LlmService {
    config: LlmConfig,
    client: reqwest::Client,
}

/// Chat-completions request format
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, empty when the model returned none
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

impl LlmService {
    /// Create a new LLM service with custom config
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.expose_secret().is_empty() {
            return Err(AulaSenseError::Config(config::ConfigError::Message(
                "OPENAI_API_KEY not set".to_string(),
            )));
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Model this service requests
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Make an API call to the chat-completions endpoint
    async fn call_api(&self, prompt: &str) -> Result<String> {
        debug!("Calling chat-completions API (model: {})", self.config.model);

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AulaSenseError::Generation(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response.json().await.map_err(|e| {
            AulaSenseError::Generation(format!("Failed to parse response: {}", e))
        })?;

        let text = api_response.into_text();
        debug!("Received {} bytes from model", text.len());
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.call_api(prompt).await
    }
}
