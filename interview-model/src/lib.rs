//! # interview-model
//!
//! Generation engines implementing [`CompletionModel`](interview_core::CompletionModel).
//!
//! - [`GroqClient`] - Groq's OpenAI-compatible chat completions API
//! - [`MockModel`] - deterministic scripted engine for tests and offline runs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use interview_model::groq::{GroqClient, GroqConfig};
//!
//! let model = GroqClient::new(GroqConfig::new(api_key, "llama-3.3-70b-versatile"))?;
//! let text = model.complete("Say hello").await?;
//! ```

#[cfg(feature = "groq")]
pub mod groq;
pub mod mock;

#[cfg(feature = "groq")]
pub use groq::{GroqClient, GroqConfig};
pub use mock::MockModel;
