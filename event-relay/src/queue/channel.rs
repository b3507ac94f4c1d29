//! Bounded FIFO channel of raw records.
//!
//! Producers wait when the queue is full. That wait is the relay's
//! backpressure: a slow webhook shows up as slower `/receive` responses.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tracing::warn;

use crate::record::RawRecord;

/// Reasons a record could not be placed on the queue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnqueueError {
    /// The queue stayed full for the whole enqueue timeout.
    #[error("queue still full after {0:?}")]
    Timeout(Duration),
    /// The consumer is gone; nothing will drain the queue.
    #[error("queue closed")]
    Closed,
}

/// Producer handle. Cheap to clone; one per request handler.
#[derive(Debug, Clone)]
pub struct RecordQueue {
    sender: mpsc::Sender<RawRecord>,
    enqueue_timeout: Option<Duration>,
}

/// Consumer handle. There is exactly one.
#[derive(Debug)]
pub struct RecordReceiver {
    receiver: mpsc::Receiver<RawRecord>,
}

/// Create a queue holding at most `capacity` records.
///
/// With `enqueue_timeout` set to `None`, producers wait for space forever.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn bounded(capacity: usize, enqueue_timeout: Option<Duration>) -> (RecordQueue, RecordReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        RecordQueue {
            sender,
            enqueue_timeout,
        },
        RecordReceiver { receiver },
    )
}

impl RecordQueue {
    /// Append a record, waiting for space if the queue is full.
    pub async fn enqueue(&self, record: RawRecord) -> Result<(), EnqueueError> {
        if self.sender.capacity() == 0 {
            warn!(
                capacity = self.sender.max_capacity(),
                timeout_ms = self.enqueue_timeout.map(|t| t.as_millis() as u64),
                "queue_full_waiting"
            );
        }

        match self.enqueue_timeout {
            None => self
                .sender
                .send(record)
                .await
                .map_err(|_| EnqueueError::Closed),
            Some(timeout) => self
                .sender
                .send_timeout(record, timeout)
                .await
                .map_err(|e| match e {
                    SendTimeoutError::Timeout(_) => EnqueueError::Timeout(timeout),
                    SendTimeoutError::Closed(_) => EnqueueError::Closed,
                }),
        }
    }

    /// Number of records waiting to be consumed.
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of records the queue holds.
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

impl RecordReceiver {
    /// Wait for the next record. Returns `None` once every producer is
    /// dropped and the queue is drained.
    pub async fn recv(&mut self) -> Option<RawRecord> {
        self.receiver.recv().await
    }

    /// Take a record if one is ready, without waiting.
    pub fn try_recv(&mut self) -> Option<RawRecord> {
        self.receiver.try_recv().ok()
    }
}
