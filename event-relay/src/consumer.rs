//! Background consumer: dequeue, transform, deliver.
//!
//! Exactly one consumer runs per service, so at most one webhook request is
//! in flight at any time. Records are handled strictly in queue order.

use tokio::sync::watch;
use tracing::{error, info};

use crate::delivery::WebhookClient;
use crate::error::DeliveryError;
use crate::queue::RecordReceiver;
use crate::record::{transform, RawRecord};

/// What the consumer is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    /// Waiting for the next record.
    Idle,
    /// Transforming and delivering a record.
    Processing,
    /// Every producer is gone and the queue is drained.
    Stopped,
}

/// Run the consumer until every producer handle is dropped.
///
/// Delivery failures are logged and the record is dropped; they never stop
/// the loop. A delivery that never completes stalls the loop, and with it
/// every producer once the queue fills.
pub async fn run(
    mut receiver: RecordReceiver,
    client: WebhookClient,
    state: watch::Sender<ConsumerState>,
) {
    info!(url = %client.url(), "consumer_started");

    let mut delivered: u64 = 0;
    let mut dropped: u64 = 0;

    while let Some(record) = receiver.recv().await {
        state.send_replace(ConsumerState::Processing);

        match process_record(&client, &record).await {
            Ok(_) => delivered += 1,
            Err(_) => dropped += 1,
        }

        state.send_replace(ConsumerState::Idle);
    }

    state.send_replace(ConsumerState::Stopped);
    info!(delivered = delivered, dropped = dropped, "consumer_stopped");
}

/// Transform one record and attempt delivery once.
pub async fn process_record(
    client: &WebhookClient,
    record: &RawRecord,
) -> Result<String, DeliveryError> {
    let canonical = transform(record);

    match client.deliver(&canonical).await {
        Ok(response) => {
            info!(
                event = %canonical.event,
                app_id = %canonical.app_id,
                message_id = %canonical.message_id,
                response = %response,
                "record_delivered"
            );
            Ok(response)
        }
        Err(e) => {
            error!(
                event = %canonical.event,
                app_id = %canonical.app_id,
                message_id = %canonical.message_id,
                reason = e.reason(),
                error = %e,
                "record_dropped"
            );
            Err(e)
        }
    }
}
