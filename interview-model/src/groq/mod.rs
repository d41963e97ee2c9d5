//! Groq provider.
//!
//! Groq serves open-weight models (Llama, Mixtral, Gemma) behind an
//! OpenAI-compatible `/chat/completions` endpoint. Each prompt is sent as a
//! single user message and the first choice's content is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use interview_model::groq::{GroqClient, GroqConfig};
//!
//! let client = GroqClient::new(
//!     GroqConfig::new(api_key, "llama-3.3-70b-versatile").with_temperature(0.2),
//! )?;
//! ```

mod client;
mod config;

pub use client::GroqClient;
pub use config::{DEFAULT_GROQ_MODEL, GROQ_API_BASE, GroqConfig};
