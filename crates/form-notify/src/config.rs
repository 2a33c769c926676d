//! Delivery configuration loaded from the environment.

use std::env;
use std::time::Duration;

/// Base URL of the event-ingest service.
pub const ENV_NOTIFY_URL: &str = "NOTIFY_URL";
/// Bearer token sent with every delivery.
pub const ENV_NOTIFY_API_KEY: &str = "NOTIFY_API_KEY";
/// Project used when an input does not name one.
pub const ENV_NOTIFY_DEFAULT_PROJECT: &str = "NOTIFY_DEFAULT_PROJECT";
/// HTTP timeout in seconds.
pub const ENV_NOTIFY_TIMEOUT_SECS: &str = "NOTIFY_TIMEOUT_SECS";
/// Environment variable to disable all deliveries.
pub const ENV_NOTIFY_DISABLED: &str = "NOTIFY_DISABLED";

const DEFAULT_PROJECT: &str = "default";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for delivering rendered webhooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Base URL of the event-ingest service.
    pub base_url: Option<String>,
    /// Bearer token for the event-ingest service.
    pub api_key: Option<String>,
    /// Project used when an input does not name one.
    pub default_project: String,
    /// Timeout for a single delivery request.
    pub timeout: Duration,
    /// Whether deliveries are switched off entirely.
    pub disabled: bool,
}

impl NotifyConfig {
    /// Load the configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: non_empty_var(ENV_NOTIFY_URL)
                .map(|url| url.trim_end_matches('/').to_string()),
            api_key: non_empty_var(ENV_NOTIFY_API_KEY),
            default_project: non_empty_var(ENV_NOTIFY_DEFAULT_PROJECT)
                .unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            timeout: Duration::from_secs(
                env::var(ENV_NOTIFY_TIMEOUT_SECS)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            disabled: env::var(ENV_NOTIFY_DISABLED)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }

    /// Configuration pointing at a specific service.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Override the default project.
    #[must_use]
    pub fn with_default_project(mut self, project: impl Into<String>) -> Self {
        self.default_project = project.into();
        self
    }

    /// True when both the service URL and the API key are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            default_project: DEFAULT_PROJECT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            disabled: false,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
