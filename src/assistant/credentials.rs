//! API credentials for the assistant provider.
//!
//! Credentials are resolved on every call rather than captured at startup,
//! so rotating the environment takes effect without a restart and a missing
//! value fails the request that needed it.

use crate::{ForgeError, Result};

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the assistant identifier.
pub const ASSISTANT_ID_ENV: &str = "OPENAI_ASSISTANT_ID";

/// Resolved credentials for one call.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub assistant_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("assistant_id", &self.assistant_id)
            .finish()
    }
}

/// Source of credentials, consulted at invocation time.
pub trait CredentialSource: Send + Sync {
    fn resolve(&self) -> Result<Credentials>;
}

/// Reads [`API_KEY_ENV`] and [`ASSISTANT_ID_ENV`] from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn resolve(&self) -> Result<Credentials> {
        Ok(Credentials {
            api_key: require_env(API_KEY_ENV)?,
            assistant_id: require_env(ASSISTANT_ID_ENV)?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ForgeError::Configuration(format!("{name} is not set"))),
    }
}

/// Fixed credentials, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>, assistant_id: impl Into<String>) -> Self {
        Self(Credentials {
            api_key: api_key.into(),
            assistant_id: assistant_id.into(),
        })
    }
}

impl CredentialSource for StaticCredentials {
    fn resolve(&self) -> Result<Credentials> {
        if self.0.api_key.is_empty() || self.0.assistant_id.is_empty() {
            return Err(ForgeError::Configuration(
                "API key and assistant id must not be empty".to_string(),
            ));
        }
        Ok(self.0.clone())
    }
}
