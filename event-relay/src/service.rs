//! Top-level relay service.
//!
//! Owns the producer side of the queue and the consumer task. Handlers get
//! queue handles through the router state; nothing is process-global.

use axum::Router;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{error, info};

use crate::config::Config;
use crate::consumer::{self, ConsumerState};
use crate::delivery::WebhookClient;
use crate::error::DeliveryError;
use crate::queue::{self, RecordQueue};
use crate::web::{self, AppState};

/// Running relay: a queue plus the single consumer draining it.
pub struct RelayService {
    queue: RecordQueue,
    consumer: JoinHandle<()>,
    state: watch::Receiver<ConsumerState>,
}

impl RelayService {
    /// Build the queue and webhook client, then spawn the consumer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: &Config) -> Result<Self, DeliveryError> {
        let client = WebhookClient::new(&config.webhook_url, config.delivery_timeout)?;
        let (queue, receiver) = queue::bounded(config.queue_capacity, config.enqueue_timeout);
        let (state_tx, state) = watch::channel(ConsumerState::Idle);

        let consumer = tokio::spawn(consumer::run(receiver, client, state_tx));

        info!(
            webhook_url = %config.webhook_url,
            queue_capacity = queue.capacity(),
            enqueue_timeout_ms = config.enqueue_timeout.map(|t| t.as_millis() as u64),
            delivery_timeout_ms = config.delivery_timeout.map(|t| t.as_millis() as u64),
            "relay_service_started"
        );

        Ok(Self {
            queue,
            consumer,
            state,
        })
    }

    /// A producer handle onto the service's queue.
    pub fn queue(&self) -> RecordQueue {
        self.queue.clone()
    }

    /// HTTP routes wired to this service's queue.
    pub fn router(&self) -> Router {
        web::router(AppState::new(self.queue()))
    }

    /// Watch the consumer's state.
    pub fn consumer_state(&self) -> watch::Receiver<ConsumerState> {
        self.state.clone()
    }

    /// Stop accepting work and wait for the consumer to drain the queue.
    ///
    /// Every router and queue handle obtained from this service must be
    /// dropped first, otherwise the consumer keeps waiting for records.
    pub async fn shutdown(self) {
        info!(queue_depth = self.queue.len(), "relay_service_draining");
        drop(self.queue);

        if let Err(e) = self.consumer.await {
            error!(error = %e, "consumer_task_failed");
        }

        info!("relay_service_stopped");
    }
}
