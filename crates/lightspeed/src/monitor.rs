//! Periodic cluster health checks through the assistant.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::client::Assistant;
use crate::error::LightspeedError;
use crate::types::{AssistantResponse, QueryContext};

/// Answer keywords that mean the namespace is fine.
const HEALTHY_KEYWORDS: [&str; 4] = ["healthy", "no issues", "running", "normal"];

/// Summary length kept for healthy answers.
const HEALTHY_SUMMARY_CHARS: usize = 150;

/// Summary length kept when issues are reported.
const ISSUE_SUMMARY_CHARS: usize = 200;

/// Checks between statistics reports.
pub const STATS_REPORT_EVERY: u64 = 10;

/// Result of one health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheck {
    Healthy { summary: String },
    Issues { summary: String },
    Error { message: String },
}

impl HealthCheck {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }

    fn from_response(response: &AssistantResponse) -> Self {
        let payload = match response {
            AssistantResponse::Failure { error_message } => {
                return Self::Error {
                    message: error_message.clone(),
                }
            }
            AssistantResponse::Success(payload) => payload,
        };

        let answer = payload.answer.as_deref().unwrap_or_default();
        let lowered = answer.to_lowercase();

        if HEALTHY_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            Self::Healthy {
                summary: truncate_chars(answer, HEALTHY_SUMMARY_CHARS),
            }
        } else {
            let answer = if answer.is_empty() { "Unknown" } else { answer };
            Self::Issues {
                summary: truncate_chars(answer, ISSUE_SUMMARY_CHARS),
            }
        }
    }
}

/// Running totals for a monitoring session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthStats {
    pub checks: u64,
    pub issues: u64,
}

impl HealthStats {
    pub fn record(&mut self, check: &HealthCheck) {
        self.checks += 1;
        if !check.is_healthy() {
            self.issues += 1;
        }
    }

    #[must_use]
    pub fn healthy(&self) -> u64 {
        self.checks - self.issues
    }

    /// Percentage of healthy checks; 0 when nothing ran yet.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.checks == 0 {
            return 0.0;
        }
        self.healthy() as f64 / self.checks as f64 * 100.0
    }

    /// True on every [`STATS_REPORT_EVERY`]th check.
    #[must_use]
    pub fn should_report(&self) -> bool {
        self.checks > 0 && self.checks % STATS_REPORT_EVERY == 0
    }
}

/// Asks the assistant about a namespace at a fixed interval.
pub struct HealthMonitor {
    assistant: Arc<dyn Assistant>,
    namespace: String,
    interval: Duration,
}

impl HealthMonitor {
    /// Create a monitor for `namespace`.
    ///
    /// `interval` must be non-zero.
    pub fn new(
        assistant: Arc<dyn Assistant>,
        namespace: impl Into<String>,
        interval: Duration,
    ) -> Result<Self, LightspeedError> {
        if interval.is_zero() {
            return Err(LightspeedError::Config(
                "check interval must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            assistant,
            namespace: namespace.into(),
            interval,
        })
    }

    /// Verify the assistant answers at all before starting the loop.
    pub async fn probe(&self) -> Result<(), LightspeedError> {
        match self.assistant.probe().await {
            AssistantResponse::Failure { error_message } => {
                Err(LightspeedError::Assistant(error_message))
            }
            AssistantResponse::Success(_) => Ok(()),
        }
    }

    /// Run a single health check.
    pub async fn check(&self) -> HealthCheck {
        let question = format!("Are there any issues in the {} namespace?", self.namespace);
        let context = QueryContext::for_namespace(self.namespace.clone());

        let check = HealthCheck::from_response(&self.assistant.query(&question, &context).await);
        match &check {
            HealthCheck::Healthy { .. } => debug!(namespace = %self.namespace, "Namespace healthy"),
            HealthCheck::Issues { summary } => {
                info!(namespace = %self.namespace, summary = %summary, "Potential issues detected");
            }
            HealthCheck::Error { message } => {
                warn!(namespace = %self.namespace, error = %message, "Health check failed");
            }
        }
        check
    }

    /// Check every interval until `shutdown` completes.
    ///
    /// `on_check` sees each result together with the updated totals. The
    /// first check runs immediately.
    pub async fn run<S, F>(&self, shutdown: S, mut on_check: F) -> HealthStats
    where
        S: Future<Output = ()>,
        F: FnMut(&HealthCheck, &HealthStats),
    {
        let mut stats = HealthStats::default();
        let mut ticker = tokio::time::interval(self.interval);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!(checks = stats.checks, issues = stats.issues, "Monitoring stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let check = self.check().await;
                    stats.record(&check);
                    on_check(&check, &stats);
                }
            }
        }

        stats
    }
}

/// Keep at most `max` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockAssistant;
    use crate::types::AnswerPayload;

    fn answer(text: &str) -> AssistantResponse {
        AssistantResponse::success(AnswerPayload {
            answer: Some(text.to_string()),
            ..AnswerPayload::default()
        })
    }

    #[test]
    fn test_classify_healthy_keywords() {
        for text in [
            "All pods are Running",
            "Namespace is HEALTHY",
            "No issues found",
            "Everything normal",
        ] {
            assert!(HealthCheck::from_response(&answer(text)).is_healthy(), "{text}");
        }
    }

    #[test]
    fn test_classify_issues() {
        let check = HealthCheck::from_response(&answer("Pod x is crash looping"));
        assert_eq!(
            check,
            HealthCheck::Issues {
                summary: "Pod x is crash looping".to_string()
            }
        );

        let empty = AssistantResponse::success(AnswerPayload::default());
        let check = HealthCheck::from_response(&empty);
        assert_eq!(
            check,
            HealthCheck::Issues {
                summary: "Unknown".to_string()
            }
        );
    }

    #[test]
    fn test_classify_failure() {
        let check = HealthCheck::from_response(&AssistantResponse::failure("HTTP 500: boom"));
        assert_eq!(
            check,
            HealthCheck::Error {
                message: "HTTP 500: boom".to_string()
            }
        );
    }

    #[test]
    fn test_summary_truncated() {
        let long = format!("healthy {}", "x".repeat(400));
        match HealthCheck::from_response(&answer(&long)) {
            HealthCheck::Healthy { summary } => assert_eq!(summary.chars().count(), 150),
            other => panic!("unexpected check: {other:?}"),
        }
    }

    #[test]
    fn test_stats() {
        let mut stats = HealthStats::default();
        assert!(stats.success_rate().abs() < f64::EPSILON);

        stats.record(&HealthCheck::Healthy {
            summary: String::new(),
        });
        stats.record(&HealthCheck::Error {
            message: String::new(),
        });
        stats.record(&HealthCheck::Issues {
            summary: String::new(),
        });
        stats.record(&HealthCheck::Healthy {
            summary: String::new(),
        });

        assert_eq!(stats.checks, 4);
        assert_eq!(stats.issues, 2);
        assert_eq!(stats.healthy(), 2);
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);
        assert!(!stats.should_report());
    }

    #[tokio::test]
    async fn test_check_asks_about_namespace() {
        let mut mock = MockAssistant::new();
        mock.expect_query()
            .withf(|question, context| {
                question.contains("issues in the self-healing-platform namespace")
                    && context.namespace.as_deref() == Some("self-healing-platform")
            })
            .times(1)
            .returning(|_, _| answer("All pods running"));

        let monitor = HealthMonitor::new(
            Arc::new(mock),
            "self-healing-platform",
            Duration::from_secs(60),
        )
        .unwrap();

        assert!(monitor.check().await.is_healthy());
    }

    #[tokio::test]
    async fn test_probe_reports_failure() {
        let mut mock = MockAssistant::new();
        mock.expect_probe()
            .returning(|| AssistantResponse::failure("Request failed: connection refused"));

        let monitor =
            HealthMonitor::new(Arc::new(mock), "default", Duration::from_secs(60)).unwrap();
        assert!(matches!(monitor.probe().await, Err(LightspeedError::Assistant(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_shutdown() {
        let mut mock = MockAssistant::new();
        mock.expect_query()
            .times(3)
            .returning(|_, _| answer("Pod x is crash looping"));

        let monitor =
            HealthMonitor::new(Arc::new(mock), "default", Duration::from_secs(10)).unwrap();

        let mut seen = 0;
        let stats = monitor
            .run(tokio::time::sleep(Duration::from_secs(25)), |_, _| seen += 1)
            .await;

        assert_eq!(seen, 3);
        assert_eq!(stats.checks, 3);
        assert_eq!(stats.issues, 3);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut mock = MockAssistant::new();
        mock.expect_query().never();

        let result = HealthMonitor::new(Arc::new(mock), "default", Duration::ZERO);

        match result {
            Err(LightspeedError::Config(message)) => {
                assert!(message.contains("interval"), "{message}");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("zero interval accepted"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_interval_runs() {
        let mut mock = MockAssistant::new();
        mock.expect_query()
            .times(2)
            .returning(|_, _| answer("All pods running"));

        let monitor =
            HealthMonitor::new(Arc::new(mock), "default", Duration::from_millis(10)).unwrap();

        let stats = monitor
            .run(tokio::time::sleep(Duration::from_millis(15)), |_, _| {})
            .await;

        assert_eq!(stats.checks, 2);
        assert_eq!(stats.issues, 0);
    }
}
