//! Batch analysis of the pods in a namespace.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::client::Assistant;
use crate::error::LightspeedError;
use crate::insight::DEFAULT_CONFIDENCE;
use crate::monitor::truncate_chars;
use crate::types::{AssistantResponse, QueryContext};

/// Pod phase treated as healthy.
const RUNNING: &str = "Running";

/// Characters of analysis kept per row.
const ANALYSIS_CHARS: usize = 100;

/// A pod and its current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSummary {
    pub name: String,
    pub status: String,
}

impl PodSummary {
    #[must_use]
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == RUNNING
    }
}

/// One row of a fleet report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodAnalysis {
    pub pod: String,
    pub status: String,
    pub analysis: String,
    pub confidence: f64,
}

/// Aggregate numbers for a fleet report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub healthy: usize,
    pub problematic: usize,
    pub average_confidence: f64,
}

/// Analysis of every pod in a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    pub namespace: String,
    pub pods: Vec<PodAnalysis>,
}

impl FleetReport {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> FleetSummary {
        let total = self.pods.len();
        let healthy = self.pods.iter().filter(|p| p.status == RUNNING).count();
        let average_confidence = if total == 0 {
            0.0
        } else {
            self.pods.iter().map(|p| p.confidence).sum::<f64>() / total as f64
        };

        FleetSummary {
            total,
            healthy,
            problematic: total - healthy,
            average_confidence,
        }
    }
}

/// Asks the assistant why each non-running pod is unhealthy.
pub struct FleetAnalyzer {
    assistant: Arc<dyn Assistant>,
}

impl FleetAnalyzer {
    #[must_use]
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }

    /// Analyze `pods` in `namespace`.
    ///
    /// Fails only when the initial pod listing query fails; per-pod failures
    /// show up as rows without analysis.
    pub async fn analyze(
        &self,
        namespace: &str,
        pods: &[PodSummary],
    ) -> Result<FleetReport, LightspeedError> {
        info!(namespace = %namespace, pods = pods.len(), "Analyzing pod fleet");

        let listing = self
            .assistant
            .query(
                &format!("List all pods in {namespace} with their status"),
                &QueryContext::for_namespace(namespace),
            )
            .await;
        if let Some(message) = listing.error_message() {
            return Err(LightspeedError::Assistant(format!(
                "failed to list pods in {namespace}: {message}"
            )));
        }

        let rows = join_all(pods.iter().map(|pod| self.analyze_pod(namespace, pod))).await;

        Ok(FleetReport {
            namespace: namespace.to_string(),
            pods: rows,
        })
    }

    async fn analyze_pod(&self, namespace: &str, pod: &PodSummary) -> PodAnalysis {
        if pod.is_running() {
            return PodAnalysis {
                pod: pod.name.clone(),
                status: pod.status.clone(),
                analysis: "Pod is healthy".to_string(),
                confidence: 1.0,
            };
        }

        info!(pod = %pod.name, status = %pod.status, "Analyzing problematic pod");

        let response = self
            .assistant
            .query(
                &format!("Why is pod {} not running?", pod.name),
                &QueryContext::for_namespace(namespace).pod(pod.name.clone()),
            )
            .await;

        let (answer, confidence) = match &response {
            AssistantResponse::Success(payload) => (
                payload.answer.as_deref(),
                payload.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            ),
            AssistantResponse::Failure { .. } => (None, DEFAULT_CONFIDENCE),
        };

        PodAnalysis {
            pod: pod.name.clone(),
            status: pod.status.clone(),
            analysis: format!(
                "{}...",
                truncate_chars(answer.unwrap_or("No analysis available"), ANALYSIS_CHARS)
            ),
            confidence,
        }
    }
}

/// The fleet used when no pod list is supplied.
#[must_use]
pub fn demo_fleet() -> Vec<PodSummary> {
    vec![
        PodSummary::new("coordination-engine-0", "Running"),
        PodSummary::new("mcp-server-abc123", "Running"),
        PodSummary::new("predictive-analytics-predictor-xyz", "CrashLoopBackOff"),
        PodSummary::new("anomaly-detector-predictor-abc", "Error"),
    ]
}
