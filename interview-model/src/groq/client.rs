//! Groq chat completions client.

use async_trait::async_trait;
use interview_core::{CompletionModel, CoreError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::config::GroqConfig;

/// A [`CompletionModel`] backed by Groq's chat completions endpoint.
pub struct GroqClient {
    client: reqwest::Client,
    config: GroqConfig,
}

impl GroqClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the API key is empty. No request is
    /// made before this check.
    pub fn new(config: GroqConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CoreError::Config(
                "GROQ_API_KEY is missing. Set it in your environment.".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn model_error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Model { model: self.config.model.clone(), message: message.into() }
    }
}

// ── Chat completions request/response types ───────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
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
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl CompletionModel for GroqClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(
            provider = "Groq",
            model = %self.config.model,
            prompt_len = prompt.len(),
            "completion request"
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage { role: "user", content: prompt }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Groq", error = %e, "request failed");
                self.model_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "Groq", %status, "API error");
            return Err(self.model_error(format!("API returned {status}: {detail}")));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "Groq", error = %e, "failed to parse response");
            self.model_error(format!("failed to parse response: {e}"))
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| self.model_error("API returned no choices"))?;

        debug!(provider = "Groq", completion_len = text.len(), "completion received");
        Ok(text)
    }
}
