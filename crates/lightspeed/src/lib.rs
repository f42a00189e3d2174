//! Confidence-gated alert response for OpenShift Lightspeed.
//!
//! This crate wraps the Lightspeed assistant's `/query` and `/recommendations`
//! endpoints and builds a small decision pipeline on top of them: an incoming
//! alert is turned into a question plus structured context, the assistant's
//! answer is normalized into an [`Insight`], and a [`DecisionEngine`] routes
//! the alert to automated remediation or human escalation.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use lightspeed::{Alert, AlertResponder, AssistantClient, AssistantConfig, ResponderConfig};
//!
//! # async fn run() -> Result<(), lightspeed::LightspeedError> {
//! let client = AssistantClient::new(AssistantConfig::from_env())?;
//! let responder = AlertResponder::new(Arc::new(client), &ResponderConfig::default());
//!
//! let alert = Alert::new("HighPodCPU")
//!     .with_namespace("self-healing-platform")
//!     .with_description("Pod coordination-engine-0 is using 85% CPU");
//!
//! let decision = responder.respond(&alert).await;
//! println!("{}", serde_json::to_string_pretty(&decision).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`Assistant`] trait defines the two assistant operations
//! - [`AssistantClient`] implements it over HTTP with a pooled connection
//! - [`AlertResponder`] composes context building, querying, extraction and
//!   the decision policy for one alert at a time
//!
//! The [`monitor`], [`fleet`] and [`capacity`] modules hold the other usage
//! patterns built on the same client.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alert;
pub mod capacity;
pub mod client;
pub mod config;
pub mod decision;
pub mod error;
pub mod fleet;
pub mod insight;
pub mod monitor;
pub mod responder;
pub mod types;

pub use alert::{Alert, AlertContextBuilder, AlertmanagerAlert, AlertmanagerPayload};
pub use capacity::{CapacityPlanner, CapacityReport};
pub use client::{Assistant, AssistantClient};
pub use config::{AssistantConfig, ResponderConfig};
pub use decision::{DecisionAction, DecisionEngine, RemediationDecision};
pub use error::{AssistantError, LightspeedError};
pub use fleet::{FleetAnalyzer, FleetReport, PodSummary};
pub use insight::{Insight, InsightStatus};
pub use monitor::{HealthCheck, HealthMonitor, HealthStats};
pub use responder::AlertResponder;
pub use types::{AnswerPayload, AssistantResponse, QueryContext};
