//! A deterministic in-process generation engine.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use interview_core::{CompletionModel, CoreError, Result};

type Responder = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A [`CompletionModel`] that answers from a script.
///
/// Each call first pops the next queued response; once the queue is empty
/// the responder closure (if any) is called with the prompt, otherwise the
/// completion is an empty string. Every prompt is recorded so tests can
/// assert on what was asked.
///
/// # Example
///
/// ```rust
/// use interview_model::MockModel;
///
/// let model = MockModel::new("mock")
///     .with_response("What is a consensus protocol?")
///     .with_responder(|prompt| format!("echo: {}", prompt.len()));
/// ```
pub struct MockModel {
    name: String,
    queued: Mutex<VecDeque<String>>,
    responder: Option<Responder>,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queued: Mutex::new(VecDeque::new()),
            responder: None,
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response returned by the next unanswered call.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.queued.lock().unwrap_or_else(PoisonError::into_inner).push_back(response.into());
        self
    }

    /// Compute responses from the prompt once the queue is drained.
    pub fn with_responder(
        mut self,
        responder: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Make every call fail with [`CoreError::Model`].
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).push(prompt.to_string());

        if let Some(message) = &self.failure {
            return Err(CoreError::Model { model: self.name.clone(), message: message.clone() });
        }

        let queued = self.queued.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        Ok(match (queued, &self.responder) {
            (Some(response), _) => response,
            (None, Some(responder)) => responder(prompt),
            (None, None) => String::new(),
        })
    }
}
