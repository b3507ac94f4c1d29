//! Outbound delivery of canonical records.
//!
//! Delivery is at-most-once and best-effort: one POST per record, no retry.

pub mod client;

pub use client::WebhookClient;
