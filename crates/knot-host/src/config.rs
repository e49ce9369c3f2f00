//! Host configuration.
//!
//! All fields have compile-time defaults; `#[serde(default)]` keeps every
//! field optional in the config file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default quiet period before an idle occurrence fires, in milliseconds.
///
/// 11.5 seconds: the quiet period the host's original deployment used.
/// Configurable, not a constant in behavior — see [`HostConfig::idle_threshold_ms`].
pub const DEFAULT_IDLE_THRESHOLD_MS: u64 = 11_500;

/// Default monitor tick width, in milliseconds.
///
/// The tick also bounds deferred-wait timeout latency: an expired entry
/// fires within one tick of its deadline.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Host configuration.
///
/// # Serialization
///
/// Serializes to TOML for file storage.
///
/// # Example
///
/// ```
/// use knot_host::HostConfig;
///
/// let config = HostConfig::default();
/// assert_eq!(config.idle_threshold_ms, 11_500);
/// assert_eq!(config.tick_interval_ms, 1_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Quiet period after which an idle occurrence fires (ms).
    pub idle_threshold_ms: u64,

    /// Width of one monitor tick (ms). Timer occurrences fire at this
    /// cadence, and the deferred-callback queue is swept once per tick.
    pub tick_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            idle_threshold_ms: DEFAULT_IDLE_THRESHOLD_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl HostConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle threshold as a [`Duration`].
    #[must_use]
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }

    /// Tick interval as a [`Duration`].
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Serializes to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
