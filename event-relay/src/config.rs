//! Configuration module for environment variable parsing.
//!
//! Every setting has a default, so the relay starts with no environment at all.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default downstream webhook receiving canonical records.
pub const DEFAULT_WEBHOOK_URL: &str = "https://webhook.site/";

/// Default number of records the queue holds before producers wait.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Destination for canonical records
    pub webhook_url: String,

    /// Capacity of the bounded queue between handlers and the consumer
    pub queue_capacity: usize,

    /// How long a handler waits for queue space. `None` waits forever.
    pub enqueue_timeout: Option<Duration>,

    /// Timeout for a single outbound delivery. `None` disables the timeout.
    pub delivery_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            enqueue_timeout: None,
            delivery_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let queue_capacity = parse_var("QUEUE_CAPACITY").unwrap_or(defaults.queue_capacity);
        let queue_capacity = if queue_capacity == 0 {
            warn!(env_var = "QUEUE_CAPACITY", "Queue capacity must be at least 1, using 1");
            1
        } else {
            queue_capacity
        };

        Config {
            port: parse_var("PORT").unwrap_or(defaults.port),

            webhook_url: env::var("WEBHOOK_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.webhook_url),

            queue_capacity,

            enqueue_timeout: parse_millis("ENQUEUE_TIMEOUT_MS"),

            delivery_timeout: parse_millis("DELIVERY_TIMEOUT_MS"),
        }
    }
}

/// Parse an environment variable, warning when it is set but malformed.
fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            None
        }
    }
}

/// Parse a millisecond duration. Zero is treated as unset.
fn parse_millis(name: &str) -> Option<Duration> {
    parse_var::<u64>(name)
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}
