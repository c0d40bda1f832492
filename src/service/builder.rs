//! Builder for configuring service instances

use std::sync::Arc;

use super::TrainingContentService;
use crate::Result;
use crate::assistant::{
    AssistantClient, CredentialSource, EnvCredentials, RetryConfig, RetryingAssistant,
    ThreadsClient, ThreadsConfig,
};
use crate::cache::CacheConfig;
use crate::generator::ContentGenerator;
use crate::queue::{QueueConfig, RequestQueue};

/// Main entry point for creating service instances.
pub struct ExamForge;

impl ExamForge {
    /// Create a new builder for configuring the service.
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::new()
    }
}

/// Builder for [`TrainingContentService`].
///
/// By default the service talks to the thread-based assistants API with
/// credentials read from the environment on every call, wrapped in
/// [`RetryingAssistant`].
///
/// ```rust,no_run
/// # use examforge::ExamForge;
/// # use examforge::cache::CacheConfig;
/// # use std::time::Duration;
/// # fn main() -> examforge::Result<()> {
/// let service = ExamForge::builder()
///     .cache(CacheConfig::new().ttl(Duration::from_secs(600)))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ServiceBuilder {
    assistant: Option<Arc<dyn AssistantClient>>,
    credentials: Option<Arc<dyn CredentialSource>>,
    threads: ThreadsConfig,
    retry: RetryConfig,
    cache: CacheConfig,
    queue: QueueConfig,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self {
            assistant: None,
            credentials: None,
            threads: ThreadsConfig::default(),
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
            queue: QueueConfig::default(),
        }
    }

    /// Use a custom assistant instead of the thread-protocol client.
    ///
    /// The retry configuration still applies: the assistant is wrapped in
    /// [`RetryingAssistant`].
    pub fn assistant(mut self, assistant: Arc<dyn AssistantClient>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Credential source for the thread-protocol client (default: environment).
    pub fn credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Endpoint and polling settings for the thread-protocol client.
    pub fn threads(mut self, config: ThreadsConfig) -> Self {
        self.threads = config;
        self
    }

    /// Retry settings applied around every assistant call.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Cache capacity and TTL.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Queue concurrency and drain delay.
    pub fn queue(mut self, config: QueueConfig) -> Self {
        self.queue = config;
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<TrainingContentService> {
        let inner: Arc<dyn AssistantClient> = match self.assistant {
            Some(assistant) => assistant,
            None => {
                let credentials = self
                    .credentials
                    .unwrap_or_else(|| Arc::new(EnvCredentials) as Arc<dyn CredentialSource>);
                Arc::new(ThreadsClient::new(credentials, self.threads)?)
            }
        };
        let assistant = Arc::new(RetryingAssistant::new(inner, self.retry));
        let queue = Arc::new(RequestQueue::new(&self.queue));
        let generator = ContentGenerator::new(assistant, queue);

        Ok(TrainingContentService::new(generator, &self.cache))
    }
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
