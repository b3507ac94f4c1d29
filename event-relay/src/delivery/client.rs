//! HTTP client that posts canonical records to the webhook.

use std::time::{Duration, Instant};

use reqwest::{header::CONTENT_TYPE, Client};
use tracing::{debug, info};
use url::Url;

use crate::error::DeliveryError;
use crate::record::CanonicalRecord;

/// Posts canonical records to a single fixed destination.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: Url,
}

impl WebhookClient {
    /// Build a client for `webhook_url`.
    ///
    /// `timeout` bounds each request end to end. With `None` a hung webhook
    /// holds the request open indefinitely.
    pub fn new(webhook_url: &str, timeout: Option<Duration>) -> Result<Self, DeliveryError> {
        let url = Url::parse(webhook_url).map_err(|source| DeliveryError::InvalidUrl {
            url: webhook_url.to_string(),
            source,
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Deliver one record. Returns the webhook's response body on 2xx.
    pub async fn deliver(&self, record: &CanonicalRecord) -> Result<String, DeliveryError> {
        let body = serde_json::to_vec(record)?;
        let body_length = body.len();
        let start = Instant::now();

        debug!(url = %self.url, body_length = body_length, "webhook_request_starting");

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        info!(
            url = %self.url,
            status_code = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            body_length = body_length,
            "webhook_request_complete"
        );

        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
