//! Wire types shared by the client and the patterns built on it.

use serde::{Deserialize, Serialize};

/// Structured context sent alongside a question.
///
/// Every key is a fixed field, so a context can never carry a key twice.
/// Unset fields are left out of the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Name of the alert being analyzed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_name: Option<String>,
    /// Namespace the question is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Alert severity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Free-form description of the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Pod the question is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    /// CPU usage in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    /// Memory usage in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    /// Container restart count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_count: Option<u32>,
    /// Planning horizon (e.g. "7 days")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

impl QueryContext {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context scoped to a single namespace.
    #[must_use]
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self::new().namespace(namespace)
    }

    #[must_use]
    pub fn alert_name(mut self, alert_name: impl Into<String>) -> Self {
        self.alert_name = Some(alert_name.into());
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn pod(mut self, pod: impl Into<String>) -> Self {
        self.pod = Some(pod.into());
        self
    }

    #[must_use]
    pub fn cpu_usage(mut self, percent: f64) -> Self {
        self.cpu_usage = Some(percent);
        self
    }

    #[must_use]
    pub fn memory_usage(mut self, percent: f64) -> Self {
        self.memory_usage = Some(percent);
        self
    }

    #[must_use]
    pub fn restart_count(mut self, count: u32) -> Self {
        self.restart_count = Some(count);
        self
    }

    #[must_use]
    pub fn timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = Some(timeframe.into());
        self
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of a successful assistant answer.
///
/// All fields are optional on the wire; [`Insight::extract`](crate::Insight::extract)
/// applies the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

/// Result of one assistant call: an answer or a failure message, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssistantResponse {
    /// The request failed at the transport or protocol level
    Failure {
        #[serde(rename = "error")]
        error_message: String,
    },
    /// The assistant answered
    Success(AnswerPayload),
}

impl AssistantResponse {
    /// Wrap a successful payload.
    #[must_use]
    pub fn success(payload: AnswerPayload) -> Self {
        Self::Success(payload)
    }

    /// Build a failure from anything printable.
    pub fn failure(message: impl std::fmt::Display) -> Self {
        Self::Failure {
            error_message: message.to_string(),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The failure message, if this is a failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { error_message } => Some(error_message),
            Self::Success(_) => None,
        }
    }

    /// The answer payload, if this is a success.
    #[must_use]
    pub fn payload(&self) -> Option<&AnswerPayload> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure { .. } => None,
        }
    }
}
