//! Configuration loading for examforged.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.examforge/config.toml` (user)
//! 3. `/etc/examforge/config.toml` (system)
//! 4. built-in defaults
//!
//! Secrets (accepted bearer tokens) are loaded separately with mandatory
//! permission checks:
//! 1. `~/.examforge/secrets.toml` (user, must be 0600)
//! 2. `/etc/examforge/secrets.toml` (system, must be 0600)
//! 3. `EXAMFORGE_AUTH_TOKENS` (comma separated)
//!
//! The assistant API key and id are not configured here: they are read from
//! the environment on every request (see [`crate::assistant::credentials`]).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::assistant::{RetryConfig, ThreadsConfig};
use crate::cache::CacheConfig;
use crate::queue::QueueConfig;
use crate::{ForgeError, Result};

/// Environment variable with comma-separated bearer tokens.
pub const AUTH_TOKENS_ENV: &str = "EXAMFORGE_AUTH_TOKENS";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub queue: QueueSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8787).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8787".to_string()
}

/// Assistant endpoint and polling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AssistantSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    ThreadsConfig::default().base_url
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_poll_timeout_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl From<&AssistantSection> for ThreadsConfig {
    fn from(s: &AssistantSection) -> Self {
        ThreadsConfig::new()
            .base_url(s.base_url.clone())
            .poll_interval(Duration::from_millis(s.poll_interval_ms))
            .poll_timeout(Duration::from_secs(s.poll_timeout_secs))
            .request_timeout(Duration::from_secs(s.request_timeout_secs))
    }
}

/// Retry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Upper bound of random jitter; 0 disables jitter.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1_000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_jitter_ms() -> u64 {
    1_000
}

impl From<&RetrySection> for RetryConfig {
    fn from(s: &RetrySection) -> Self {
        RetryConfig::new()
            .max_attempts(s.max_attempts)
            .initial_delay(Duration::from_millis(s.initial_delay_ms))
            .max_delay(Duration::from_millis(s.max_delay_ms))
            .jitter(s.jitter_ms > 0)
            .max_jitter(Duration::from_millis(s.jitter_ms))
    }
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    30 * 60
}

fn default_max_entries() -> u64 {
    1_000
}

impl From<&CacheSection> for CacheConfig {
    fn from(s: &CacheSection) -> Self {
        CacheConfig::new()
            .ttl(Duration::from_secs(s.ttl_secs))
            .max_entries(s.max_entries)
    }
}

/// Request queue settings.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSection {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_drain_delay_ms")]
    pub drain_delay_ms: u64,
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            drain_delay_ms: default_drain_delay_ms(),
        }
    }
}

fn default_max_concurrent() -> usize {
    crate::queue::DEFAULT_MAX_CONCURRENT
}

fn default_drain_delay_ms() -> u64 {
    crate::queue::DEFAULT_DRAIN_DELAY.as_millis() as u64
}

impl From<&QueueSection> for QueueConfig {
    fn from(s: &QueueSection) -> Self {
        QueueConfig::new()
            .max_concurrent(s.max_concurrent)
            .drain_delay(Duration::from_millis(s.drain_delay_ms))
    }
}

/// Secrets configuration (accepted bearer tokens).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub auth: Option<AuthSecret>,
}

/// Bearer tokens accepted by the HTTP API.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSecret {
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl Config {
    /// Load configuration from the standard locations, or defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ForgeError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ForgeError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. An explicit path must exist.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ForgeError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".examforge").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/examforge/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (tokens may come from the environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".examforge").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/examforge/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            ForgeError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ForgeError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            ForgeError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(ForgeError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Accepted bearer tokens, falling back to [`AUTH_TOKENS_ENV`].
    pub fn auth_tokens(&self) -> Vec<String> {
        let from_file = self
            .auth
            .as_ref()
            .map(|a| a.tokens.clone())
            .filter(|t| !t.is_empty());

        from_file.unwrap_or_else(|| {
            std::env::var(AUTH_TOKENS_ENV)
                .map(|v| parse_token_list(&v))
                .unwrap_or_default()
        })
    }
}

fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
