//! Error types for the ingest and delivery sides of the relay.
//!
//! Ingest errors reach the HTTP caller as a status code. Delivery errors
//! happen after the caller has been acknowledged, so the consumer only logs
//! them.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::queue::EnqueueError;

/// Failures while accepting a record on `/receive`.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error("Error reading request body")]
    BodyRead(#[source] BytesRejection),

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Queue is full")]
    QueueSaturated,

    #[error("Service is shutting down")]
    QueueClosed,
}

impl IngestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            IngestError::BodyRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            IngestError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            IngestError::QueueSaturated | IngestError::QueueClosed => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl From<EnqueueError> for IngestError {
    fn from(e: EnqueueError) -> Self {
        match e {
            EnqueueError::Timeout(_) => IngestError::QueueSaturated,
            EnqueueError::Closed => IngestError::QueueClosed,
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Failures while handing a canonical record to the webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("invalid webhook url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl DeliveryError {
    /// Short label used as the `reason` field in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            DeliveryError::Serialization(_) => "serialization",
            DeliveryError::Request(e) if e.is_timeout() => "timeout",
            DeliveryError::Request(_) => "network",
            DeliveryError::Status { .. } => "status",
            DeliveryError::InvalidUrl { .. } => "invalid_url",
        }
    }
}
