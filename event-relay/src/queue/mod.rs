//! In-process bounded queue between the web handlers and the consumer.
//!
//! ```text
//! Handlers (many) → RecordQueue → RecordReceiver → Consumer (one)
//! ```
//!
//! The queue is the only state shared between request tasks and the consumer.

pub mod channel;

pub use channel::{bounded, EnqueueError, RecordQueue, RecordReceiver};
