//! examforge error types

use std::time::Duration;

/// examforge error types
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    // Thread protocol errors
    #[error("run {run_id} ended with status '{status}'")]
    RunFailed { run_id: String, status: String },

    #[error("run {run_id} still pending after {waited:?}")]
    PollTimeout { run_id: String, waited: Duration },

    #[error("no assistant message in thread {thread_id}")]
    NoAssistantMessage { thread_id: String },

    // Content errors
    #[error("malformed content: {0}")]
    MalformedContent(String),

    #[error("generated content is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("request queue closed")]
    QueueClosed,
}

impl ForgeError {
    /// Whether a fresh attempt of the whole remote sequence may succeed.
    ///
    /// Every upstream failure is transient: network errors, any non-2xx
    /// response (including 401), rate limiting, run failures, polling
    /// timeouts and runs that produced no assistant message. Local errors
    /// (configuration, input, content parsing, closed queue) are permanent.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ForgeError::Http(_)
                | ForgeError::Api { .. }
                | ForgeError::RateLimited { .. }
                | ForgeError::AuthenticationFailed
                | ForgeError::RunFailed { .. }
                | ForgeError::PollTimeout { .. }
                | ForgeError::NoAssistantMessage { .. }
        )
    }

    /// Server-provided retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ForgeError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Configuration errors are the only generation errors surfaced to callers.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ForgeError::Configuration(_))
    }
}

/// Result type alias for examforge operations
pub type Result<T> = std::result::Result<T, ForgeError>;
