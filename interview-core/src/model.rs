//! The generation engine contract.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// A text generation engine.
///
/// This is the only shape the interview pipeline relies on: one prompt in,
/// one completion out. Wrappers (judge adapters, mocks, hosted clients) all
/// implement it directly, so callers never need to inspect what kind of
/// engine they hold.
///
/// Calls are awaited one at a time by every caller in this workspace and no
/// timeout is imposed; implementations that talk to a network service should
/// configure their own.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// The model identifier, used in logs and adapter names.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: CompletionModel + ?Sized> CompletionModel for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}
