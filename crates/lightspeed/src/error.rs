//! Error types for the Lightspeed client and patterns.

use thiserror::Error;

/// Failures inside the assistant client.
///
/// These never leave the client as `Err`: the client folds them into
/// [`AssistantResponse::Failure`](crate::AssistantResponse::Failure) and the
/// `Display` text becomes the failure message.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The request was rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request exceeded the configured timeout
    #[error("Request failed: timed out after {0}s")]
    Timeout(u64),

    /// The server could not be reached
    #[error("Request failed: could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON
    #[error("Malformed response body: {0}")]
    Decode(String),

    /// The server answered 200 with an error payload
    #[error("{0}")]
    Remote(String),

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AssistantError {
    /// Classify a transport error from reqwest.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_connect() {
            Self::Connect {
                url: url.to_string(),
                source: err,
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

/// Errors surfaced by the library outside the decision pipeline.
#[derive(Debug, Error)]
pub enum LightspeedError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The assistant returned a failure that the caller cannot recover from
    #[error("Assistant request failed: {0}")]
    Assistant(String),
}
