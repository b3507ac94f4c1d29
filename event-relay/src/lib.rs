//! Event Relay - asynchronous event-tracking relay.
//!
//! Tracking payloads posted to `/receive` are acknowledged immediately,
//! queued, reshaped into the canonical schema, and posted to a webhook by a
//! single background consumer.
//!
//! ## Architecture
//!
//! ```text
//! POST /receive → RecordQueue (bounded) → Consumer → transform() → WebhookClient → webhook
//! ```

pub mod config;
pub mod consumer;
pub mod delivery;
pub mod error;
pub mod queue;
pub mod record;
pub mod service;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use consumer::ConsumerState;
pub use delivery::WebhookClient;
pub use error::{DeliveryError, IngestError};
pub use queue::{EnqueueError, RecordQueue, RecordReceiver};
pub use record::{transform, CanonicalRecord, RawRecord, TaggedValue};
pub use service::RelayService;
pub use web::AppState;
