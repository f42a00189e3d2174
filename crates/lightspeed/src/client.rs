//! HTTP client for the Lightspeed assistant.
//!
//! Provides the two assistant operations:
//! - `POST /query` with a natural-language question
//! - `POST /recommendations` with an issue type
//!
//! Every transport and protocol failure is folded into
//! [`AssistantResponse::Failure`]; callers never see an `Err` from here.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AssistantConfig;
use crate::error::{AssistantError, LightspeedError};
use crate::types::{AssistantResponse, QueryContext};

/// Question sent by [`Assistant::probe`].
const PROBE_QUESTION: &str = "Hello";

/// Timeout for connectivity probes, independent of the request timeout.
const PROBE_TIMEOUT_SECS: u64 = 10;

/// Operations offered by the assistant.
///
/// Implementations must be safe to share across concurrent callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Ask a natural-language question.
    async fn query(&self, question: &str, context: &QueryContext) -> AssistantResponse;

    /// Ask for recommendations for a kind of issue.
    async fn get_recommendations(
        &self,
        issue_type: &str,
        context: &QueryContext,
    ) -> AssistantResponse;

    /// Cheap connectivity check.
    async fn probe(&self) -> AssistantResponse {
        self.query(PROBE_QUESTION, &QueryContext::new()).await
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
    context: &'a QueryContext,
}

#[derive(Serialize)]
struct RecommendationRequest<'a> {
    issue_type: &'a str,
    context: &'a QueryContext,
}

/// HTTP client for the Lightspeed server.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    config: AssistantConfig,
    client: reqwest::Client,
}

impl AssistantClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AssistantConfig) -> Result<Self, LightspeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// POST a JSON body and normalize whatever comes back.
    async fn post<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> AssistantResponse {
        let url = format!("{}/{endpoint}", self.config.base_url());

        debug!(url = %url, "Sending request to Lightspeed");

        match self.send(&url, body, timeout).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Lightspeed request failed");
                AssistantResponse::failure(e)
            }
        }
    }

    async fn send<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<AssistantResponse, AssistantError> {
        let timeout_secs = timeout.map_or(self.config.timeout_secs, |t| t.as_secs());

        let mut request = self.client.post(url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AssistantError::from_transport(e, url, timeout_secs))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AssistantError::from_transport(e, url, timeout_secs))?;

        if !status.is_success() {
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        match decode_body(&text)? {
            AssistantResponse::Failure { error_message } => {
                Err(AssistantError::Remote(error_message))
            }
            success @ AssistantResponse::Success(_) => Ok(success),
        }
    }
}

/// Parse a response body, accepting only a JSON object.
///
/// Derived struct impls also accept sequences by position, so the shape is
/// checked before the typed decode.
fn decode_body(text: &str) -> Result<AssistantResponse, AssistantError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AssistantError::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(AssistantError::Decode(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| AssistantError::Decode(e.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AssistantError> {
    if value.trim().is_empty() {
        return Err(AssistantError::InvalidRequest(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

#[async_trait]
impl Assistant for AssistantClient {
    async fn query(&self, question: &str, context: &QueryContext) -> AssistantResponse {
        if let Err(e) = require_non_empty("question", question) {
            return AssistantResponse::failure(e);
        }

        self.post("query", &QueryRequest { question, context }, None).await
    }

    async fn get_recommendations(
        &self,
        issue_type: &str,
        context: &QueryContext,
    ) -> AssistantResponse {
        if let Err(e) = require_non_empty("issue_type", issue_type) {
            return AssistantResponse::failure(e);
        }

        self.post(
            "recommendations",
            &RecommendationRequest {
                issue_type,
                context,
            },
            None,
        )
        .await
    }

    async fn probe(&self) -> AssistantResponse {
        self.post(
            "query",
            &QueryRequest {
                question: PROBE_QUESTION,
                context: &QueryContext::new(),
            },
            Some(Duration::from_secs(PROBE_TIMEOUT_SECS)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AssistantClient::new(AssistantConfig::default()).unwrap();
        assert!(!client.config().base_url.is_empty());
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected_without_network() {
        // Unroutable base URL: reaching the network would fail differently.
        let client = AssistantClient::new(AssistantConfig::new("http://invalid.invalid")).unwrap();

        let response = client.query("   ", &QueryContext::new()).await;

        let message = response.error_message().unwrap();
        assert!(message.contains("question must not be empty"), "{message}");
    }

    #[tokio::test]
    async fn test_empty_issue_type_is_rejected() {
        let client = AssistantClient::new(AssistantConfig::new("http://invalid.invalid")).unwrap();

        let response = client.get_recommendations("", &QueryContext::new()).await;

        assert!(response.error_message().unwrap().contains("issue_type"));
    }

    #[test]
    fn test_decode_body_rejects_non_objects() {
        for body in ["[]", r#"["Restart pod", 0.99]"#, "0.99", r#""ok""#, "null"] {
            let err = decode_body(body).unwrap_err();
            let AssistantError::Decode(message) = &err else {
                panic!("{body}: unexpected error {err}");
            };
            assert!(message.starts_with("expected a JSON object"), "{body}: {message}");
        }
    }

    #[test]
    fn test_decode_body_accepts_objects() {
        let response = decode_body(r#"{"answer": "ok", "confidence": 0.5}"#).unwrap();
        assert_eq!(response.payload().unwrap().confidence, Some(0.5));

        let response = decode_body(r#"{"error": "model unavailable"}"#).unwrap();
        assert_eq!(response.error_message(), Some("model unavailable"));
    }

    #[test]
    fn test_query_request_shape() {
        let context = QueryContext::for_namespace("default");
        let body = serde_json::to_value(QueryRequest {
            question: "What is the cluster health?",
            context: &context,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "question": "What is the cluster health?",
                "context": {"namespace": "default"}
            })
        );
    }
}
