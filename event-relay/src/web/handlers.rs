//! Endpoint handlers.
//!
//! `/receive` only parses and enqueues. Transformation and delivery happen in
//! the background consumer, so a 200 means "accepted", not "delivered".

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::Method,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::IngestError;
use crate::queue::RecordQueue;
use crate::record::RawRecord;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub queue: RecordQueue,
}

impl AppState {
    pub fn new(queue: RecordQueue) -> Self {
        Self { queue }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Event Ingest
// =============================================================================

/// Tracking event endpoint.
///
/// This endpoint:
/// 1. Rejects anything but POST
/// 2. Parses the body as a raw record, whatever the content type
/// 3. Enqueues it, waiting while the queue is full
/// 4. Returns 200 `Success`
pub async fn receive(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<&'static str, IngestError> {
    if method != Method::POST {
        warn!(method = %method, "receive_method_not_allowed");
        return Err(IngestError::MethodNotAllowed);
    }

    let body = body.map_err(|e| {
        error!(error = %e, "receive_body_read_failed");
        IngestError::BodyRead(e)
    })?;

    let record = RawRecord::from_slice(&body).map_err(|e| {
        warn!(error = %e, body_length = body.len(), "receive_invalid_json");
        IngestError::InvalidJson(e)
    })?;

    info!(
        event = %record.ev,
        app_id = %record.id,
        message_id = %record.mid,
        attribute_count = record.attributes.len(),
        trait_count = record.traits.len(),
        "receive_record_parsed"
    );

    if let Err(e) = state.queue.enqueue(record).await {
        error!(error = %e, "receive_enqueue_failed");
        return Err(e.into());
    }

    info!(queue_depth = state.queue.len(), "record_enqueued");

    Ok("Success")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
        Router,
    };
    use tower::ServiceExt;

    use crate::queue::{self, RecordReceiver};
    use crate::web::router;

    fn app(capacity: usize, enqueue_timeout: Option<Duration>) -> (Router, RecordReceiver) {
        let (queue, receiver) = queue::bounded(capacity, enqueue_timeout);
        (router(AppState::new(queue)), receiver)
    }

    fn request(method: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/receive")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _receiver) = app(1, None);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_valid_record_is_enqueued() {
        let (app, mut receiver) = app(10, None);
        let response = app
            .oneshot(request(
                "POST",
                r#"{"ev":"click","id":"app1","attributes":{"x":"1"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Success");

        let record = receiver.try_recv().unwrap();
        assert_eq!(record.ev, "click");
        assert_eq!(record.id, "app1");
        assert_eq!(record.attributes.get("x"), Some(&"1".to_string()));
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_non_post_methods_rejected() {
        let (app, mut receiver) = app(10, None);

        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let response = app
                .clone()
                .oneshot(request(method, r#"{"ev":"click"}"#))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        }

        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_invalid_json_rejected() {
        let (app, mut receiver) = app(10, None);

        for body in ["", "{", "not json", r#"{"ev": 5}"#, r#"{"traits": ["a"]}"#] {
            let response = app.clone().oneshot(request("POST", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body:?}");
            assert_eq!(body_text(response).await, "Invalid JSON");
        }

        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_content_type_is_not_required() {
        let (app, mut receiver) = app(10, None);
        let request = Request::builder()
            .method("POST")
            .uri("/receive")
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"ev":"view"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(receiver.try_recv().unwrap().ev, "view");
    }

    #[tokio::test]
    async fn test_saturated_queue_with_timeout_returns_503() {
        let (app, mut receiver) = app(1, Some(Duration::from_millis(20)));

        let first = app.clone().oneshot(request("POST", r#"{"ev":"a"}"#)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(request("POST", r#"{"ev":"b"}"#)).await.unwrap();
        assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(receiver.try_recv().unwrap().ev, "a");
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_saturated_queue_without_timeout_blocks() {
        let (app, mut receiver) = app(1, None);

        let first = app.clone().oneshot(request("POST", r#"{"ev":"a"}"#)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let blocked = tokio::time::timeout(
            Duration::from_millis(100),
            app.clone().oneshot(request("POST", r#"{"ev":"b"}"#)),
        )
        .await;
        assert!(blocked.is_err(), "producer should still be waiting for space");

        assert_eq!(receiver.try_recv().unwrap().ev, "a");
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_closed_queue_returns_503() {
        let (app, receiver) = app(1, None);
        drop(receiver);

        let response = app.oneshot(request("POST", "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
