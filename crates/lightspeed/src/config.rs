//! Configuration for the assistant client and alert responder.
//!
//! Defaults are plain constants. `from_env` constructors read the same
//! environment variables the CLI exposes, but nothing here is global: callers
//! build a config value and pass it into the constructors that need it.

use crate::error::LightspeedError;

/// Default Lightspeed service URL (in-cluster service DNS)
pub const DEFAULT_SERVER_URL: &str = "http://lightspeed-app-server.openshift-lightspeed.svc:8080";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Confidence an answer must exceed before remediation is automated
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Namespace used when an alert carries none
pub const DEFAULT_ALERT_NAMESPACE: &str = "default";

const ENV_SERVER_URL: &str = "OLS_SERVER_URL";
const ENV_TIMEOUT_SECS: &str = "OLS_TIMEOUT_SECS";
const ENV_CONFIDENCE_THRESHOLD: &str = "CONFIDENCE_THRESHOLD";

/// Configuration for the assistant client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Base URL of the Lightspeed server
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AssistantConfig {
    /// Create a config for the given server with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Build from `OLS_SERVER_URL` and `OLS_TIMEOUT_SECS`, falling back to
    /// the defaults for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var(ENV_SERVER_URL).unwrap_or(defaults.base_url),
            timeout_secs: std::env::var(ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Base URL without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Configuration for the alert responder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderConfig {
    /// Confidence an answer must strictly exceed to auto-remediate
    pub threshold: f64,
    /// Namespace assumed for alerts without one
    pub default_namespace: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            default_namespace: DEFAULT_ALERT_NAMESPACE.to_string(),
        }
    }
}

impl ResponderConfig {
    /// Override the confidence threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Build from `CONFIDENCE_THRESHOLD`, falling back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            threshold: std::env::var(ENV_CONFIDENCE_THRESHOLD)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.threshold),
            ..defaults
        }
    }

    /// Reject thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), LightspeedError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(LightspeedError::Config(format!(
                "confidence threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.default_namespace.trim().is_empty() {
            return Err(LightspeedError::Config(
                "default namespace must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
