//! # interview-core
//!
//! Contracts shared by every crate of the mock interview engine.
//!
//! - [`CompletionModel`] - the single `complete(prompt) -> text` seam every
//!   generation engine implements
//! - [`InterviewTurn`] and [`Transcript`] - the session's output shape, which
//!   the evaluator consumes later
//! - [`CoreError`] - configuration and model failures

pub mod error;
pub mod model;
pub mod transcript;

pub use error::{CoreError, Result};
pub use model::CompletionModel;
pub use transcript::{InterviewTurn, Transcript};
