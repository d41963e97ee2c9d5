use std::time::Duration;

/// Base URL of Groq's OpenAI-compatible API.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// The model used when none is configured.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Connection settings for [`GroqClient`](super::GroqClient).
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Optional HTTP timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GROQ_API_BASE.to_string(),
            temperature: None,
            max_tokens: None,
            timeout: None,
        }
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
