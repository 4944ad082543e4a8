//! Configuration for the task router
//!
//! Handles the provider credential, endpoint settings and runtime knobs.
//! Everything is read from the environment once at process start.

use std::env;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the chat-completion credential
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_BASE_URL: &str = "BASECAMP_LLM_BASE_URL";
pub const ENV_SITE_URL: &str = "BASECAMP_SITE_URL";
pub const ENV_APP_NAME: &str = "BASECAMP_APP_NAME";
pub const ENV_TIMEOUT_SECS: &str = "BASECAMP_LLM_TIMEOUT_SECS";
pub const ENV_BATCH_DELAY_MS: &str = "BASECAMP_BATCH_DELAY_MS";
pub const ENV_DEFAULT_INPUT_TOKENS: &str = "BASECAMP_DEFAULT_INPUT_TOKENS";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "https://basecamp.travel";
pub const DEFAULT_APP_NAME: &str = "Basecamp Adventures";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;
/// Token count assumed for cost estimates when a task carries no length hint
pub const DEFAULT_INPUT_LENGTH: u32 = 1000;

/// Error types for configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Unknown model id: {0}")]
    UnknownModel(String),
}

/// Runtime settings for the router and its HTTP transport
#[derive(Clone)]
pub struct RouterSettings {
    /// Bearer credential (env: OPENROUTER_API_KEY)
    pub api_key: Option<String>,
    /// Base URL of the chat-completion API, without the `/chat/completions` suffix
    pub base_url: String,
    /// Sent as `HTTP-Referer` on every request
    pub site_url: String,
    /// Sent as `X-Title` on every request
    pub app_name: String,
    /// Connect + response deadline for a single call
    pub request_timeout: Duration,
    /// Pause between consecutive batch items
    pub batch_pacing: Duration,
    /// Input length assumed by the cost estimate when a task has no hint
    pub default_input_length: u32,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            batch_pacing: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            default_input_length: DEFAULT_INPUT_LENGTH,
        }
    }
}

impl RouterSettings {
    /// Load settings from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            api_key: env::var(ENV_API_KEY).ok().filter(|k| !k.trim().is_empty()),
            base_url: env::var(ENV_BASE_URL).unwrap_or(defaults.base_url),
            site_url: env::var(ENV_SITE_URL).unwrap_or(defaults.site_url),
            app_name: env::var(ENV_APP_NAME).unwrap_or(defaults.app_name),
            request_timeout: parse_env(ENV_TIMEOUT_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            batch_pacing: parse_env(ENV_BATCH_DELAY_MS)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.batch_pacing),
            default_input_length: parse_env::<u32>(ENV_DEFAULT_INPUT_TOKENS)?
                .unwrap_or(defaults.default_input_length),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_batch_pacing(mut self, pacing: Duration) -> Self {
        self.batch_pacing = pacing;
        self
    }

    /// Check that a credential is present
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(ENV_API_KEY.to_string()))
    }

    /// URL of the chat-completion endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// Keep the credential out of logs.
impl fmt::Debug for RouterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("site_url", &self.site_url)
            .field("app_name", &self.app_name)
            .field("request_timeout", &self.request_timeout)
            .field("batch_pacing", &self.batch_pacing)
            .field("default_input_length", &self.default_input_length)
            .finish()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                ConfigError::Invalid(format!("{name} must be a non-negative integer, got {raw:?}"))
            }),
        Err(_) => Ok(None),
    }
}
