//! Alert response pipeline: context → query → insight → decision.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};

use crate::alert::{Alert, AlertContextBuilder};
use crate::client::Assistant;
use crate::config::ResponderConfig;
use crate::decision::{DecisionEngine, RemediationDecision};
use crate::insight::Insight;

/// Routes alerts to auto-remediation or escalation.
///
/// Holds no per-alert state, so one responder can serve any number of alerts
/// concurrently.
#[derive(Clone)]
pub struct AlertResponder {
    assistant: Arc<dyn Assistant>,
    contexts: AlertContextBuilder,
    engine: DecisionEngine,
}

impl AlertResponder {
    /// Create a responder over the given assistant.
    #[must_use]
    pub fn new(assistant: Arc<dyn Assistant>, config: &ResponderConfig) -> Self {
        Self {
            assistant,
            contexts: AlertContextBuilder::new(config.default_namespace.clone()),
            engine: DecisionEngine::new(config.threshold),
        }
    }

    /// The decision engine in use.
    #[must_use]
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Produce exactly one decision for one alert.
    ///
    /// Failures of the assistant come back as
    /// [`RemediationDecision::Error`]; nothing is retried here.
    pub async fn respond(&self, alert: &Alert) -> RemediationDecision {
        let span = info_span!("respond", alert = %alert.name);

        async {
            let (question, context) = self.contexts.build(alert);
            debug!(question = %question, "Querying assistant for alert");

            let response = self.assistant.query(&question, &context).await;
            let insight = Insight::extract(&response);

            self.engine.decide(insight, &alert.name)
        }
        .instrument(span)
        .await
    }

    /// Respond to many alerts concurrently.
    ///
    /// Decisions come back in the same order as `alerts`.
    pub async fn respond_all(&self, alerts: &[Alert]) -> Vec<RemediationDecision> {
        join_all(alerts.iter().map(|alert| self.respond(alert))).await
    }
}
