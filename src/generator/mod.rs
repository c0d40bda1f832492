//! Content generation: prompt building, queued assistant call, parsing.

pub mod parse;
pub mod templates;

use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::assistant::AssistantClient;
use crate::queue::RequestQueue;
use crate::types::{GeneratedContent, GenerationRequest};

pub use parse::{extract_json, parse_content};
pub use templates::{PromptTemplate, build_prompt, template_for};

/// Turns a [`GenerationRequest`] into validated content.
///
/// Every assistant call goes through the shared [`RequestQueue`], so the
/// number of simultaneous upstream calls never exceeds the queue's limit.
pub struct ContentGenerator {
    assistant: Arc<dyn AssistantClient>,
    queue: Arc<RequestQueue>,
}

impl ContentGenerator {
    pub fn new(assistant: Arc<dyn AssistantClient>, queue: Arc<RequestQueue>) -> Self {
        Self { assistant, queue }
    }

    /// Configuration check of the underlying assistant.
    pub fn preflight(&self) -> Result<()> {
        self.assistant.preflight()
    }

    /// Generate, parse and validate content for `request`.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        let prompt = build_prompt(request);
        let assistant = Arc::clone(&self.assistant);

        let raw = self
            .queue
            .enqueue(|| async move { assistant.complete(&prompt).await })
            .await?;
        debug!(
            assistant = self.assistant.name(),
            training_type = %request.training_type(),
            bytes = raw.len(),
            "assistant answered"
        );

        parse_content(&raw, request.training_type())
    }

    pub fn queue(&self) -> &Arc<RequestQueue> {
        &self.queue
    }
}
