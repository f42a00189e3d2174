//! HTTP server for Alertmanager webhooks.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use lightspeed::{Alert, AlertResponder, AlertmanagerPayload, DecisionAction, RemediationDecision};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server state for the webhook receiver.
pub struct ServerState {
    /// Responder shared by all requests
    pub responder: AlertResponder,
}

/// Build the webhook router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/alerts", post(alert_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Response for the alert handler.
#[derive(Debug, Serialize)]
struct AlertResponse {
    status: &'static str,
    alerts_processed: usize,
    alerts_skipped: usize,
    decisions: Vec<RemediationDecision>,
}

/// Alertmanager webhook handler.
///
/// Firing alerts are decided concurrently; resolved alerts are skipped.
async fn alert_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<AlertmanagerPayload>,
) -> impl IntoResponse {
    let total = payload.alerts.len();
    info!(
        group_key = %payload.group_key,
        receiver = %payload.receiver,
        status = %payload.status,
        alerts = total,
        "Received alert webhook"
    );

    let alerts: Vec<Alert> = payload
        .alerts
        .iter()
        .filter(|a| a.is_firing())
        .map(Alert::from)
        .collect();
    let skipped = total - alerts.len();

    let decisions = state.responder.respond_all(&alerts).await;

    let status = if decisions
        .iter()
        .any(|d| d.action() == DecisionAction::Error)
    {
        "partial"
    } else {
        "ok"
    };

    (
        StatusCode::OK,
        Json(AlertResponse {
            status,
            alerts_processed: alerts.len(),
            alerts_skipped: skipped,
            decisions,
        }),
    )
}

async fn health_handler() -> &'static str {
    "ok"
}
