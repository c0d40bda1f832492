//! The seam between content generation and the remote assistant.
//!
//! Generation only needs "prompt in, text out". Implementations hide the
//! remote protocol; decorators such as
//! [`RetryingAssistant`](super::RetryingAssistant) wrap any implementation.

use async_trait::async_trait;

use crate::Result;

/// A remote assistant that turns a prompt into a text completion.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Assistant name for logging/metrics.
    fn name(&self) -> &str;

    /// Check that the client is configured well enough to attempt a call.
    ///
    /// Returns `Configuration` errors only. Called before any cache lookup so
    /// a misconfigured deployment fails loudly instead of serving fallbacks.
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    /// Produce the assistant's text answer to `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
