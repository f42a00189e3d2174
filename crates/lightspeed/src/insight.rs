//! Normalized view of an assistant response.

use serde::{Deserialize, Serialize};

use crate::types::AssistantResponse;

/// Confidence assumed when a successful answer does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 0.0;

/// Outcome of the underlying assistant call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightStatus {
    #[default]
    Success,
    Error,
}

/// Actionable information extracted from one assistant response.
///
/// `confidence` is only meaningful when `status` is [`InsightStatus::Success`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub status: InsightStatus,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Insight {
    /// Extract an insight from a response.
    ///
    /// Total: missing answer fields take their defaults (empty answer,
    /// [`DEFAULT_CONFIDENCE`], no sources, no recommendations) instead of
    /// being treated as malformed.
    #[must_use]
    pub fn extract(response: &AssistantResponse) -> Self {
        match response {
            AssistantResponse::Failure { error_message } => Self {
                status: InsightStatus::Error,
                error_message: Some(error_message.clone()),
                ..Self::default()
            },
            AssistantResponse::Success(payload) => Self {
                status: InsightStatus::Success,
                answer: payload.answer.clone().unwrap_or_default(),
                confidence: payload.confidence.unwrap_or(DEFAULT_CONFIDENCE),
                sources: payload.sources.clone().unwrap_or_default(),
                recommendations: payload.recommendations.clone().unwrap_or_default(),
                error_message: None,
            },
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == InsightStatus::Error
    }
}

impl From<&AssistantResponse> for Insight {
    fn from(response: &AssistantResponse) -> Self {
        Self::extract(response)
    }
}
