//! The judge seam the metrics score through.

use std::sync::Arc;

use async_trait::async_trait;
use interview_core::{CompletionModel, Result};

/// A model that grades metric prompts.
#[async_trait]
pub trait JudgeModel: Send + Sync {
    fn model_name(&self) -> String;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Serves any [`CompletionModel`] as a judge, trimming its output.
pub struct JudgeAdapter {
    model: Arc<dyn CompletionModel>,
}

impl JudgeAdapter {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl JudgeModel for JudgeAdapter {
    fn model_name(&self) -> String {
        format!("JudgeAdapter({})", self.model.name())
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(self.model.complete(prompt).await?.trim().to_string())
    }
}
