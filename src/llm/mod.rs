//! Language model access
//!
//! The pipeline only depends on the [`LanguageModel`] trait; the concrete
//! [`ChatClient`] speaks the OpenAI-compatible chat completions API, which
//! covers both hosted endpoints and local Ollama.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

/// Failures of the language model service
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("rate limited")]
    RateLimited,

    #[error("timeout")]
    Timeout,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Text generation seam used by the classifier and the synthesizer
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate text for the given prompt
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;
}

/// OpenAI-compatible chat completions client
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
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
    content: String,
}

impl ChatClient {
    /// Create a client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.llm.endpoint.trim_end_matches('/').to_string(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
        })
    }
}

#[async_trait]
impl LanguageModel for ChatClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {}", url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Auth(body));
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimited),
            status if !status.is_success() => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(LlmError::Http(format!("API error ({status}): {body}")));
            }
            _ => {}
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Malformed("no choices in response".to_string()))
    }
}
