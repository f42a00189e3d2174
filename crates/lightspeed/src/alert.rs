//! Alerts and the mapping from an alert to an assistant question.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::DEFAULT_ALERT_NAMESPACE;
use crate::types::QueryContext;

/// Severity assumed when an alert carries none.
pub const DEFAULT_SEVERITY: &str = "warning";

/// Prefix of the question asked for every alert.
const ALERT_QUESTION_PREFIX: &str = "Analyze this alert and suggest remediation: ";

/// An incoming alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert name (e.g. `HighPodCPU`)
    pub name: String,
    /// Namespace where the condition was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Severity (critical, warning, info)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Alert {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            severity: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Alertmanager webhook payload.
///
/// Reference: <https://prometheus.io/docs/alerting/latest/configuration/#webhook_config>
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertmanagerPayload {
    /// Unique identifier for this group of alerts
    #[serde(default)]
    pub group_key: String,
    /// Status: "firing" or "resolved"
    #[serde(default)]
    pub status: String,
    /// Receiver that matched this alert
    #[serde(default)]
    pub receiver: String,
    /// List of alerts in this notification
    pub alerts: Vec<AlertmanagerAlert>,
}

/// Individual alert from Alertmanager.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertmanagerAlert {
    /// Status: "firing" or "resolved"
    #[serde(default = "firing")]
    pub status: String,
    /// Alert labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Alert annotations
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

fn firing() -> String {
    "firing".to_string()
}

impl AlertmanagerAlert {
    /// Get the alert name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.labels.get("alertname").map_or("unknown", String::as_str)
    }

    /// Check if this is a firing alert.
    #[must_use]
    pub fn is_firing(&self) -> bool {
        self.status == "firing"
    }
}

impl From<&AlertmanagerAlert> for Alert {
    fn from(alert: &AlertmanagerAlert) -> Self {
        Self {
            name: alert.name().to_string(),
            namespace: alert.labels.get("namespace").cloned(),
            severity: alert.labels.get("severity").cloned(),
            description: alert.annotations.get("description").cloned(),
        }
    }
}

/// Turns alerts into the question and context sent to the assistant.
#[derive(Debug, Clone)]
pub struct AlertContextBuilder {
    default_namespace: String,
}

impl Default for AlertContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_NAMESPACE)
    }
}

impl AlertContextBuilder {
    /// Create a builder that assigns `default_namespace` to alerts without one.
    #[must_use]
    pub fn new(default_namespace: impl Into<String>) -> Self {
        Self {
            default_namespace: default_namespace.into(),
        }
    }

    /// Build the question and context for an alert.
    ///
    /// Never fails: missing namespace, severity and description fall back to
    /// the configured namespace, `"warning"` and `""`.
    #[must_use]
    pub fn build(&self, alert: &Alert) -> (String, QueryContext) {
        let description = alert.description.clone().unwrap_or_default();

        let question = format!("{ALERT_QUESTION_PREFIX}{description}");

        let context = QueryContext::new()
            .alert_name(alert.name.clone())
            .namespace(
                alert
                    .namespace
                    .clone()
                    .unwrap_or_else(|| self.default_namespace.clone()),
            )
            .severity(
                alert
                    .severity
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
            )
            .description(description);

        (question, context)
    }
}
