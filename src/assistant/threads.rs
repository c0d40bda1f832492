//! Client for the thread-based assistants protocol.
//!
//! One call to [`ThreadsClient::complete`] is a single attempt that walks a
//! small state machine:
//!
//! ```text
//! CreateThread -> PostMessage -> CreateRun -> Poll -> FetchResult
//! ```
//!
//! Each step is one (or, for polling, several) HTTP calls and must finish
//! before the next starts. Any non-2xx response ends the attempt. Retrying is
//! left to [`RetryingAssistant`](super::RetryingAssistant), which restarts at
//! `CreateThread`: the protocol is treated as idempotent by recreation, and
//! abandoned threads are not cleaned up.
//!
//! See: <https://platform.openai.com/docs/api-reference/threads>

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::credentials::{CredentialSource, Credentials};
use super::traits::AssistantClient;
use crate::telemetry;
use crate::{ForgeError, Result};

/// Default base URL for the OpenAI API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Beta header required by the assistants endpoints.
const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Longest upstream error body kept in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Timing and endpoint settings for [`ThreadsClient`].
#[derive(Debug, Clone)]
pub struct ThreadsConfig {
    /// API base URL. Default: `https://api.openai.com/v1`.
    pub base_url: String,
    /// Interval between run status checks. Default: 1s.
    pub poll_interval: Duration,
    /// Give up on a run after this long. Default: 60s.
    pub poll_timeout: Duration,
    /// Timeout of each individual HTTP call. Default: 30s.
    pub request_timeout: Duration,
}

impl Default for ThreadsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(1),
            poll_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ThreadsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point at a different API host (e.g. a wiremock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for the thread/run assistants API. See module docs.
#[derive(Clone)]
pub struct ThreadsClient {
    http: Client,
    credentials: Arc<dyn CredentialSource>,
    config: ThreadsConfig,
}

/// Where an attempt currently is.
#[derive(Debug)]
enum Step {
    CreateThread,
    PostMessage { thread_id: String },
    CreateRun { thread_id: String },
    Poll { thread_id: String, run_id: String },
    FetchResult { thread_id: String },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::CreateThread => "create_thread",
            Step::PostMessage { .. } => "post_message",
            Step::CreateRun { .. } => "create_run",
            Step::Poll { .. } => "poll",
            Step::FetchResult { .. } => "fetch_result",
        }
    }
}

impl ThreadsClient {
    /// Create a client. Credentials are resolved on every call.
    pub fn new(credentials: Arc<dyn CredentialSource>, config: ThreadsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ForgeError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            credentials,
            config,
        })
    }

    /// Run one full attempt of the protocol and return the assistant's text.
    pub async fn run_once(&self, prompt: &str) -> Result<String> {
        let creds = self.credentials.resolve()?;
        let mut step = Step::CreateThread;

        loop {
            debug!(step = step.name(), "assistant protocol step");
            step = match step {
                Step::CreateThread => Step::PostMessage {
                    thread_id: self.create_thread(&creds).await?,
                },
                Step::PostMessage { thread_id } => {
                    self.post_message(&creds, &thread_id, prompt).await?;
                    Step::CreateRun { thread_id }
                }
                Step::CreateRun { thread_id } => {
                    let run_id = self.create_run(&creds, &thread_id).await?;
                    Step::Poll { thread_id, run_id }
                }
                Step::Poll { thread_id, run_id } => {
                    self.wait_for_run(&creds, &thread_id, &run_id).await?;
                    Step::FetchResult { thread_id }
                }
                Step::FetchResult { thread_id } => {
                    return self.fetch_result(&creds, &thread_id).await;
                }
            };
        }
    }

    async fn create_thread(&self, creds: &Credentials) -> Result<String> {
        let url = format!("{}/threads", self.config.base_url);
        let thread: ThreadObject = self
            .send(
                "create_thread",
                creds,
                self.http.post(&url).json(&serde_json::json!({})),
            )
            .await?;
        Ok(thread.id)
    }

    async fn post_message(&self, creds: &Credentials, thread_id: &str, prompt: &str) -> Result<()> {
        let url = format!("{}/threads/{}/messages", self.config.base_url, thread_id);
        let _: serde_json::Value = self
            .send(
                "post_message",
                creds,
                self.http.post(&url).json(&CreateMessageRequest {
                    role: "user",
                    content: prompt,
                }),
            )
            .await?;
        Ok(())
    }

    async fn create_run(&self, creds: &Credentials, thread_id: &str) -> Result<String> {
        let url = format!("{}/threads/{}/runs", self.config.base_url, thread_id);
        let run: RunObject = self
            .send(
                "create_run",
                creds,
                self.http.post(&url).json(&CreateRunRequest {
                    assistant_id: &creds.assistant_id,
                }),
            )
            .await?;
        Ok(run.id)
    }

    /// Poll until the run reaches a terminal status or the poll timeout elapses.
    async fn wait_for_run(&self, creds: &Credentials, thread_id: &str, run_id: &str) -> Result<()> {
        let url = format!(
            "{}/threads/{}/runs/{}",
            self.config.base_url, thread_id, run_id
        );
        let started = Instant::now();

        loop {
            let run: RunObject = self.send("poll", creds, self.http.get(&url)).await?;
            match run.status {
                RunStatus::Completed => return Ok(()),
                status if status.is_terminal() => {
                    let reason = run
                        .last_error
                        .map(|e| format!("{}: {}", status.as_str(), e.message))
                        .unwrap_or_else(|| status.as_str().to_string());
                    warn!(run_id, thread_id, status = status.as_str(), "run did not complete");
                    return Err(ForgeError::RunFailed {
                        run_id: run_id.to_string(),
                        status: reason,
                    });
                }
                status => debug!(run_id, status = status.as_str(), "run pending"),
            }

            let waited = started.elapsed();
            if waited >= self.config.poll_timeout {
                return Err(ForgeError::PollTimeout {
                    run_id: run_id.to_string(),
                    waited,
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Fetch the thread's messages and return the first assistant message's text.
    async fn fetch_result(&self, creds: &Credentials, thread_id: &str) -> Result<String> {
        let url = format!(
            "{}/threads/{}/messages?order=desc",
            self.config.base_url, thread_id
        );
        let list: MessageList = self.send("fetch_result", creds, self.http.get(&url)).await?;

        list.data
            .into_iter()
            .find(|m| m.role == "assistant")
            .map(ThreadMessage::into_text)
            .ok_or_else(|| ForgeError::NoAssistantMessage {
                thread_id: thread_id.to_string(),
            })
    }

    /// Attach auth headers, send, check status and decode the JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        step: &'static str,
        creds: &Credentials,
        request: RequestBuilder,
    ) -> Result<T> {
        let result: Result<T> = async {
            let response = request
                .bearer_auth(&creds.api_key)
                .header(BETA_HEADER.0, BETA_HEADER.1)
                .send()
                .await
                .map_err(|e| ForgeError::Http(e.to_string()))?;

            let response = check_status(response).await?;
            response
                .json::<T>()
                .await
                .map_err(|e| ForgeError::Http(format!("invalid {step} response: {e}")))
        }
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::UPSTREAM_CALLS_TOTAL, "step" => step, "status" => status)
            .increment(1);
        result
    }
}

/// Map non-2xx responses to errors.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => Err(ForgeError::AuthenticationFailed),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(ForgeError::RateLimited { retry_after })
        }
        code => {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| message.is_char_boundary(*i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            Err(ForgeError::Api {
                status: code,
                message,
            })
        }
    }
}

#[async_trait]
impl AssistantClient for ThreadsClient {
    fn name(&self) -> &str {
        "openai-threads"
    }

    fn preflight(&self) -> Result<()> {
        self.credentials.resolve().map(|_| ())
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let started = std::time::Instant::now();
        let result = self.run_once(prompt).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::histogram!(telemetry::ASSISTANT_ATTEMPT_DURATION_SECONDS, "status" => status)
            .record(started.elapsed().as_secs_f64());
        result
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
    #[serde(default)]
    last_error: Option<RunError>,
}

#[derive(Deserialize)]
struct RunError {
    #[serde(default)]
    message: String,
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether polling should stop.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
                | RunStatus::Incomplete
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<ThreadMessage>,
}

#[derive(Deserialize)]
struct ThreadMessage {
    role: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

impl ThreadMessage {
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.value),
                ContentPart::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text {
        text: TextValue,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct TextValue {
    value: String,
}
