//! Configuration management for the ticketing client.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present) with defaults matching the shipped app.

use crate::notifications::InboxEnvironment;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Checkout configuration
    pub checkout: CheckoutConfig,
    /// Notification inbox configuration
    pub notifications: NotificationConfig,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

/// Checkout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Simulated payment processing time in milliseconds (default: 2000)
    pub processing_delay_ms: u64,
}

/// Notification inbox configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Leftward swipe distance, in points, that marks a row read (default: 75)
    pub swipe_read_threshold: u16,
    /// Pull-to-refresh spinner duration in milliseconds (default: 2000)
    pub refresh_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        Self {
            checkout: CheckoutConfig {
                processing_delay_ms: parsed("CHECKOUT_PROCESSING_DELAY_MS").unwrap_or(2000),
            },
            notifications: NotificationConfig {
                swipe_read_threshold: parsed("NOTIFICATION_SWIPE_THRESHOLD").unwrap_or(75),
                refresh_delay_ms: parsed("NOTIFICATION_REFRESH_DELAY_MS").unwrap_or(2000),
            },
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checkout: CheckoutConfig {
                processing_delay_ms: 2000,
            },
            notifications: NotificationConfig {
                swipe_read_threshold: 75,
                refresh_delay_ms: 2000,
            },
            log_level: "info".to_string(),
        }
    }
}

impl CheckoutConfig {
    /// Processing delay as a `Duration`
    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

impl NotificationConfig {
    /// Inbox reducer environment for these settings
    #[must_use]
    pub const fn inbox_environment(&self) -> InboxEnvironment {
        InboxEnvironment::new(
            self.swipe_read_threshold,
            Duration::from_millis(self.refresh_delay_ms),
        )
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
