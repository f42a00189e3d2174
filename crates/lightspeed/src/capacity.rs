//! Capacity planning reports built from assistant predictions.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::client::Assistant;
use crate::insight::DEFAULT_CONFIDENCE;
use crate::types::{AnswerPayload, AssistantResponse, QueryContext};

/// Times of day a prediction is requested for.
pub const PREDICTION_TIMES: [&str; 4] = ["9 AM", "12 PM", "3 PM", "6 PM"];

/// Horizon for capacity recommendations.
const RECOMMENDATION_TIMEFRAME: &str = "7 days";

const ISSUE_TYPE: &str = "capacity_planning";

const REPORT_VERSION: &str = "1.0";

/// Answer text and confidence for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub answer: String,
    pub confidence: f64,
}

impl Estimate {
    fn from_response(response: &AssistantResponse, fallback: &str) -> Self {
        let payload = response.payload();
        Self {
            answer: payload
                .and_then(|p| p.answer.clone())
                .unwrap_or_else(|| fallback.to_string()),
            confidence: payload
                .and_then(|p| p.confidence)
                .unwrap_or(DEFAULT_CONFIDENCE),
        }
    }
}

/// Predicted usage at one time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPrediction {
    pub time: String,
    #[serde(flatten)]
    pub estimate: Estimate,
}

/// Recommendations section: the assistant's payload or why it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapacityRecommendations {
    Unavailable { error: String },
    Available(AnswerPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub server: String,
    pub report_version: String,
}

/// A complete capacity planning report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub namespace: String,
    pub generated_at: DateTime<Utc>,
    pub current_usage: Estimate,
    pub predictions: Vec<TimedPrediction>,
    pub recommendations: CapacityRecommendations,
    pub metadata: ReportMetadata,
}

/// Generates [`CapacityReport`]s.
pub struct CapacityPlanner {
    assistant: Arc<dyn Assistant>,
    server: String,
}

impl CapacityPlanner {
    /// `server` is recorded in the report metadata only.
    #[must_use]
    pub fn new(assistant: Arc<dyn Assistant>, server: impl Into<String>) -> Self {
        Self {
            assistant,
            server: server.into(),
        }
    }

    /// Build a report for `namespace`.
    ///
    /// Assistant failures degrade individual sections to their placeholders
    /// instead of failing the report.
    pub async fn generate(&self, namespace: &str) -> CapacityReport {
        let context = QueryContext::for_namespace(namespace);

        info!(namespace = %namespace, "Fetching current resource usage");
        let current = self
            .assistant
            .query(
                &format!("What's the current resource usage in {namespace}?"),
                &context,
            )
            .await;

        info!(namespace = %namespace, "Generating time-based predictions");
        let predictions = join_all(PREDICTION_TIMES.iter().map(|time| {
            let context = &context;
            async move {
                let response = self
                    .assistant
                    .query(&format!("What will resource usage be at {time}?"), context)
                    .await;
                TimedPrediction {
                    time: (*time).to_string(),
                    estimate: Estimate::from_response(&response, "No prediction available"),
                }
            }
        }))
        .await;

        info!(namespace = %namespace, "Fetching capacity recommendations");
        let recommendations = match self
            .assistant
            .get_recommendations(
                ISSUE_TYPE,
                &QueryContext::for_namespace(namespace).timeframe(RECOMMENDATION_TIMEFRAME),
            )
            .await
        {
            AssistantResponse::Success(payload) => CapacityRecommendations::Available(payload),
            AssistantResponse::Failure { error_message } => CapacityRecommendations::Unavailable {
                error: error_message,
            },
        };

        CapacityReport {
            namespace: namespace.to_string(),
            generated_at: Utc::now(),
            current_usage: Estimate::from_response(&current, "No data available"),
            predictions,
            recommendations,
            metadata: ReportMetadata {
                server: self.server.clone(),
                report_version: REPORT_VERSION.to_string(),
            },
        }
    }
}
