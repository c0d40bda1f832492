//! Remote assistant adapter.
//!
//! - [`AssistantClient`] — the "prompt in, text out" seam used by the
//!   content generator.
//! - [`ThreadsClient`] — the thread/message/run/poll/fetch protocol, one
//!   attempt per call.
//! - [`RetryingAssistant`] — decorator adding exponential backoff with jitter.
//! - [`CredentialSource`] — API key and assistant id, resolved per call.

pub mod credentials;
pub mod retry;
pub mod threads;
pub mod traits;

pub use credentials::{CredentialSource, Credentials, EnvCredentials, StaticCredentials};
pub use retry::{RetryConfig, RetryingAssistant};
pub use threads::{RunStatus, ThreadsClient, ThreadsConfig};
pub use traits::AssistantClient;
