//! Tests for the retrying assistant decorator.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use examforge::assistant::{AssistantClient, RetryConfig, RetryingAssistant};
use examforge::{ForgeError, Result};

/// Fails with a chosen error for the first `failures` calls, then succeeds.
struct FailThenSucceed {
    failures: u32,
    error: fn() -> ForgeError,
    calls: AtomicU32,
}

impl FailThenSucceed {
    fn new(failures: u32, error: fn() -> ForgeError) -> Arc<Self> {
        Arc::new(Self {
            failures,
            error,
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssistantClient for FailThenSucceed {
    fn name(&self) -> &str {
        "fail-then-succeed"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err((self.error)())
        } else {
            Ok(format!("reply to {prompt}"))
        }
    }
}

/// Preflight always reports a configuration problem.
struct Unconfigured;

#[async_trait]
impl AssistantClient for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn preflight(&self) -> Result<()> {
        Err(ForgeError::Configuration("OPENAI_API_KEY is not set".into()))
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        unreachable!("complete must not be called")
    }
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig::new()
        .max_attempts(max_attempts)
        .initial_delay(Duration::from_millis(1))
        .max_delay(Duration::from_millis(5))
        .jitter(false)
}

#[tokio::test]
async fn retries_transient_errors_until_success() {
    let mock = FailThenSucceed::new(2, || ForgeError::Http("connection reset".into()));
    let client = RetryingAssistant::new(mock.clone(), fast_retry(3));

    let reply = client.complete("bonjour").await.unwrap();
    assert_eq!(reply, "reply to bonjour");
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let mock = FailThenSucceed::new(10, || ForgeError::PollTimeout {
        run_id: "run_1".into(),
        waited: Duration::from_secs(60),
    });
    let client = RetryingAssistant::new(mock.clone(), fast_retry(3));

    let err = client.complete("bonjour").await.unwrap_err();
    assert!(matches!(err, ForgeError::PollTimeout { .. }));
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn configuration_errors_are_not_retried() {
    let mock = FailThenSucceed::new(10, || {
        ForgeError::Configuration("OPENAI_API_KEY is not set".into())
    });
    let client = RetryingAssistant::new(mock.clone(), fast_retry(3));

    let err = client.complete("bonjour").await.unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn client_errors_are_retried_until_attempts_run_out() {
    let errors: [fn() -> ForgeError; 3] = [
        || ForgeError::Api {
            status: 400,
            message: "bad request".into(),
        },
        || ForgeError::Api {
            status: 403,
            message: "forbidden".into(),
        },
        || ForgeError::Api {
            status: 404,
            message: "no such assistant".into(),
        },
    ];
    for error in errors {
        let mock = FailThenSucceed::new(10, error);
        let client = RetryingAssistant::new(mock.clone(), fast_retry(3));

        let err = client.complete("x").await.unwrap_err();
        assert!(matches!(err, ForgeError::Api { .. }));
        assert_eq!(mock.calls(), 3, "{err}");
    }
}

#[tokio::test]
async fn upstream_auth_failure_is_retried() {
    let mock = FailThenSucceed::new(1, || ForgeError::AuthenticationFailed);
    let client = RetryingAssistant::new(mock.clone(), fast_retry(3));

    client.complete("x").await.unwrap();
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn server_errors_and_rate_limits_are_retried() {
    let mock = FailThenSucceed::new(1, || ForgeError::Api {
        status: 503,
        message: "unavailable".into(),
    });
    let client = RetryingAssistant::new(mock.clone(), fast_retry(3));
    client.complete("x").await.unwrap();
    assert_eq!(mock.calls(), 2);

    let mock = FailThenSucceed::new(1, || ForgeError::RateLimited {
        retry_after: Some(Duration::from_millis(1)),
    });
    let client = RetryingAssistant::new(mock.clone(), fast_retry(3));
    client.complete("x").await.unwrap();
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn disabled_retry_makes_a_single_attempt() {
    let mock = FailThenSucceed::new(1, || ForgeError::Http("timeout".into()));
    let client = RetryingAssistant::new(mock.clone(), RetryConfig::disabled());

    assert!(client.complete("x").await.is_err());
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn zero_max_attempts_still_tries_once() {
    let mock = FailThenSucceed::new(0, || ForgeError::Http("unused".into()));
    let client = RetryingAssistant::new(mock.clone(), fast_retry(0));

    client.complete("x").await.unwrap();
    assert_eq!(mock.calls(), 1);
}

#[test]
fn preflight_and_name_are_delegated() {
    let client = RetryingAssistant::new(Arc::new(Unconfigured), fast_retry(3));
    assert_eq!(client.name(), "unconfigured");
    assert!(matches!(
        client.preflight(),
        Err(ForgeError::Configuration(_))
    ));
}
