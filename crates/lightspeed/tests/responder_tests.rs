//! End-to-end tests for the alert response pipeline.

use async_trait::async_trait;
use lightspeed::decision::LOW_CONFIDENCE_REASON;
use lightspeed::{
    Alert, AlertResponder, AnswerPayload, Assistant, AssistantClient, AssistantConfig,
    AssistantResponse, DecisionAction, QueryContext, RemediationDecision, ResponderConfig,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Fakes
// =============================================================================

/// Answers every query with a fixed response.
struct FixedAssistant {
    response: AssistantResponse,
    calls: AtomicUsize,
}

impl FixedAssistant {
    fn answering(answer: &str, confidence: f64) -> Self {
        Self::new(AssistantResponse::success(AnswerPayload {
            answer: Some(answer.to_string()),
            confidence: Some(confidence),
            ..AnswerPayload::default()
        }))
    }

    fn new(response: AssistantResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Assistant for FixedAssistant {
    async fn query(&self, _question: &str, _context: &QueryContext) -> AssistantResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }

    async fn get_recommendations(
        &self,
        _issue_type: &str,
        _context: &QueryContext,
    ) -> AssistantResponse {
        panic!("the responder never asks for recommendations");
    }
}

/// Echoes the context back so each decision can be traced to its alert.
///
/// Confidence is derived from the alert number so that half of the alerts
/// auto-remediate and half escalate.
struct EchoAssistant;

#[async_trait]
impl Assistant for EchoAssistant {
    async fn query(&self, question: &str, context: &QueryContext) -> AssistantResponse {
        let name = context.alert_name.clone().unwrap_or_default();
        let index: u32 = name.trim_start_matches("Alert-").parse().unwrap_or(0);

        // Yield so that in-flight alerts interleave.
        tokio::time::sleep(Duration::from_millis(u64::from(index % 7))).await;

        AssistantResponse::success(AnswerPayload {
            answer: Some(format!(
                "{name}|{}|{question}",
                context.namespace.clone().unwrap_or_default()
            )),
            confidence: Some(if index % 2 == 0 { 0.9 } else { 0.3 }),
            sources: None,
            recommendations: Some(vec![format!("fix {name}")]),
        })
    }

    async fn get_recommendations(
        &self,
        _issue_type: &str,
        _context: &QueryContext,
    ) -> AssistantResponse {
        AssistantResponse::failure("unused")
    }
}

fn high_cpu_alert() -> Alert {
    Alert::new("HighPodCPU")
        .with_namespace("self-healing-platform")
        .with_description("Pod X using 85% CPU")
}

fn responder(assistant: Arc<dyn Assistant>) -> AlertResponder {
    AlertResponder::new(assistant, &ResponderConfig::default().with_threshold(0.8))
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_high_confidence_auto_remediates() {
    let assistant = Arc::new(FixedAssistant::answering("Restart pod", 0.92));
    let decision = responder(assistant.clone()).respond(&high_cpu_alert()).await;

    assert_eq!(decision.action(), DecisionAction::AutoRemediate);
    assert_eq!(decision.confidence(), Some(0.92));
    assert_eq!(assistant.calls.load(Ordering::SeqCst), 1);

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["action"], "auto_remediate");
    assert_eq!(json["alert"], "HighPodCPU");
    assert_eq!(json["confidence"], 0.92);
    assert_eq!(json["analysis"], "Restart pod");
}

#[tokio::test]
async fn test_low_confidence_escalates() {
    let assistant = Arc::new(FixedAssistant::answering("Unclear", 0.45));
    let decision = responder(assistant).respond(&high_cpu_alert()).await;

    assert_eq!(decision.action(), DecisionAction::Escalate);
    assert_eq!(decision.confidence(), Some(0.45));

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["action"], "escalate");
    assert_eq!(json["reason"], LOW_CONFIDENCE_REASON);
    assert_eq!(json["analysis"]["answer"], "Unclear");
}

#[tokio::test]
async fn test_confidence_equal_to_threshold_escalates() {
    let assistant = Arc::new(FixedAssistant::answering("Probably restart", 0.8));
    let decision = responder(assistant).respond(&high_cpu_alert()).await;

    assert_eq!(decision.action(), DecisionAction::Escalate);
}

#[tokio::test]
async fn test_missing_confidence_escalates() {
    let assistant = Arc::new(FixedAssistant::new(AssistantResponse::success(
        AnswerPayload {
            answer: Some("Restart pod".to_string()),
            ..AnswerPayload::default()
        },
    )));
    let decision = responder(assistant).respond(&high_cpu_alert()).await;

    assert_eq!(decision.action(), DecisionAction::Escalate);
    assert_eq!(decision.confidence(), Some(0.0));
}

#[tokio::test]
async fn test_timeout_yields_error_decision() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"answer": "Restart pod", "confidence": 0.99}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client =
        AssistantClient::new(AssistantConfig::new(server.uri()).with_timeout(1)).unwrap();
    let decision = responder(Arc::new(client)).respond(&high_cpu_alert()).await;

    match &decision {
        RemediationDecision::Error { alert, message } => {
            assert_eq!(alert, "HighPodCPU");
            assert!(!message.is_empty());
        }
        other => panic!("expected error decision, got {other:?}"),
    }
    assert_eq!(decision.confidence(), None);

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["action"], "error");
    assert!(json.get("confidence").is_none());
}

#[tokio::test]
async fn test_concurrent_alerts_do_not_share_context() {
    let responder = responder(Arc::new(EchoAssistant));

    let alerts: Vec<Alert> = (0..100)
        .map(|i| {
            Alert::new(format!("Alert-{i}"))
                .with_namespace(format!("ns-{i}"))
                .with_description(format!("condition {i}"))
        })
        .collect();

    let decisions = responder.respond_all(&alerts).await;
    assert_eq!(decisions.len(), 100);

    for (i, decision) in decisions.iter().enumerate() {
        let name = format!("Alert-{i}");
        assert_eq!(decision.alert_name(), name);

        let expected_answer = format!(
            "{name}|ns-{i}|Analyze this alert and suggest remediation: condition {i}"
        );
        match decision {
            RemediationDecision::AutoRemediate {
                analysis,
                recommendations,
                ..
            } => {
                assert_eq!(i % 2, 0);
                assert_eq!(analysis, &expected_answer);
                assert_eq!(recommendations, &vec![format!("fix {name}")]);
            }
            RemediationDecision::Escalate { analysis, .. } => {
                assert_eq!(i % 2, 1);
                assert_eq!(analysis.answer, expected_answer);
            }
            RemediationDecision::Error { .. } => panic!("unexpected error for {name}"),
        }
    }
}

#[tokio::test]
async fn test_concurrent_spawned_responders() {
    let responder = Arc::new(responder(Arc::new(EchoAssistant)));

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let responder = Arc::clone(&responder);
            tokio::spawn(async move {
                let alert = Alert::new(format!("Alert-{i}"));
                responder.respond(&alert).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let decision = handle.await.unwrap();
        assert_eq!(decision.alert_name(), format!("Alert-{i}"));
    }
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({
            "context": {
                "alert_name": "HighPodCPU",
                "namespace": "self-healing-platform",
                "severity": "warning",
                "description": "Pod X using 85% CPU"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Restart pod",
            "confidence": 0.92,
            "sources": ["runbooks/high-cpu.md"],
            "recommendations": ["oc delete pod X -n self-healing-platform"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AssistantClient::new(AssistantConfig::new(server.uri())).unwrap();
    let decision = responder(Arc::new(client)).respond(&high_cpu_alert()).await;

    assert_eq!(
        decision,
        RemediationDecision::AutoRemediate {
            alert: "HighPodCPU".to_string(),
            confidence: 0.92,
            analysis: "Restart pod".to_string(),
            recommendations: vec!["oc delete pod X -n self-healing-platform".to_string()],
        }
    );
}
