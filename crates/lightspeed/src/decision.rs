//! Confidence-gated remediation policy.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::insight::{Insight, InsightStatus};

/// Reason attached to every escalation.
pub const LOW_CONFIDENCE_REASON: &str = "Low confidence in automated remediation";

/// Kind of routing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    AutoRemediate,
    Escalate,
    Error,
}

impl DecisionAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AutoRemediate => "auto_remediate",
            Self::Escalate => "escalate",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing outcome for one alert.
///
/// Serialized with an `action` tag for the remediation executor:
/// `auto_remediate`, `escalate` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RemediationDecision {
    /// Confident enough to remediate without a human
    AutoRemediate {
        alert: String,
        confidence: f64,
        analysis: String,
        recommendations: Vec<String>,
    },
    /// Hand the alert to a human along with everything the assistant said
    Escalate {
        alert: String,
        confidence: f64,
        analysis: Insight,
        reason: String,
    },
    /// The assistant could not be consulted
    Error { alert: String, message: String },
}

impl RemediationDecision {
    #[must_use]
    pub fn action(&self) -> DecisionAction {
        match self {
            Self::AutoRemediate { .. } => DecisionAction::AutoRemediate,
            Self::Escalate { .. } => DecisionAction::Escalate,
            Self::Error { .. } => DecisionAction::Error,
        }
    }

    #[must_use]
    pub fn alert_name(&self) -> &str {
        match self {
            Self::AutoRemediate { alert, .. }
            | Self::Escalate { alert, .. }
            | Self::Error { alert, .. } => alert,
        }
    }

    /// Confidence behind the decision; `None` for errors.
    #[must_use]
    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::AutoRemediate { confidence, .. } | Self::Escalate { confidence, .. } => {
                Some(*confidence)
            }
            Self::Error { .. } => None,
        }
    }
}

/// Applies the confidence threshold to an insight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionEngine {
    threshold: f64,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl DecisionEngine {
    /// Create an engine with the given threshold.
    ///
    /// Remediation is automated only when confidence is strictly greater
    /// than `threshold`; a tie escalates.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify an insight.
    #[must_use]
    pub fn decide(&self, insight: Insight, alert_name: &str) -> RemediationDecision {
        if insight.status == InsightStatus::Error {
            let message = insight.error_message.unwrap_or_default();
            warn!(alert = %alert_name, error = %message, "Assistant unavailable, no decision made");
            return RemediationDecision::Error {
                alert: alert_name.to_string(),
                message,
            };
        }

        let confidence = insight.confidence;

        if confidence > self.threshold {
            info!(
                alert = %alert_name,
                confidence,
                threshold = self.threshold,
                "High confidence, auto-remediating"
            );
            RemediationDecision::AutoRemediate {
                alert: alert_name.to_string(),
                confidence,
                analysis: insight.answer,
                recommendations: insight.recommendations,
            }
        } else {
            info!(
                alert = %alert_name,
                confidence,
                threshold = self.threshold,
                "Low confidence, escalating to human"
            );
            RemediationDecision::Escalate {
                alert: alert_name.to_string(),
                confidence,
                analysis: insight,
                reason: LOW_CONFIDENCE_REASON.to_string(),
            }
        }
    }
}
