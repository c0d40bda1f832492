use std::time::Duration;

use examforge::{ForgeError, Result};

#[test]
fn test_error_display() {
    let err = ForgeError::MissingField { field: "questions" };
    assert!(err.to_string().contains("questions"));

    let err = ForgeError::RunFailed {
        run_id: "run_1".into(),
        status: "expired".into(),
    };
    assert!(err.to_string().contains("run_1"));
    assert!(err.to_string().contains("expired"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(ForgeError::QueueClosed)
    }
    assert!(returns_error().is_err());
}

#[test]
fn json_errors_convert() {
    let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: ForgeError = parse.unwrap_err().into();
    assert!(matches!(err, ForgeError::Json(_)));
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(ForgeError::RateLimited { retry_after: None }.is_transient());
    assert!(ForgeError::Http("connection reset".into()).is_transient());
    assert!(ForgeError::AuthenticationFailed.is_transient());
    for status in [400, 403, 404, 408, 409, 422, 429, 500, 502, 503, 504] {
        assert!(
            ForgeError::Api {
                status,
                message: String::new()
            }
            .is_transient(),
            "{status} should be transient"
        );
    }
    assert!(
        ForgeError::RunFailed {
            run_id: "r".into(),
            status: "failed".into()
        }
        .is_transient()
    );
    assert!(
        ForgeError::PollTimeout {
            run_id: "r".into(),
            waited: Duration::from_secs(60)
        }
        .is_transient()
    );
    assert!(
        ForgeError::NoAssistantMessage {
            thread_id: "t".into()
        }
        .is_transient()
    );
}

#[test]
fn permanent_errors() {
    assert!(!ForgeError::InvalidInput("x".into()).is_transient());
    assert!(!ForgeError::Configuration("x".into()).is_transient());
    assert!(!ForgeError::MalformedContent("x".into()).is_transient());
    assert!(!ForgeError::MissingField { field: "steps" }.is_transient());
    assert!(!ForgeError::QueueClosed.is_transient());
}

#[test]
fn retry_after_only_from_rate_limits() {
    let hint = Duration::from_secs(3);
    assert_eq!(
        ForgeError::RateLimited {
            retry_after: Some(hint)
        }
        .retry_after(),
        Some(hint)
    );
    assert_eq!(ForgeError::Http("x".into()).retry_after(), None);
}

#[test]
fn only_configuration_errors_are_configuration() {
    assert!(ForgeError::Configuration("x".into()).is_configuration());
    assert!(!ForgeError::AuthenticationFailed.is_configuration());
    assert!(!ForgeError::Http("x".into()).is_configuration());
}
