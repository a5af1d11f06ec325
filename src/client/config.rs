//! HTTP transport configuration.

use serde::{Deserialize, Serialize};

/// Settings for [`HttpTransport`](super::HttpTransport).
///
/// There is deliberately no retry knob: a failed write is reported and then
/// treated as complete by the queue.
///
/// # Examples
///
/// ```
/// use rig_config_sync::client::ClientConfig;
///
/// let config = ClientConfig {
///     request_timeout_ms: 5_000,
///     ..Default::default()
/// };
/// assert!(config.enable_logging);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Proxy URL for all requests; empty disables the proxy.
    pub proxy_url: String,
    /// Emit transport-level tracing events.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 30_000,
            proxy_url: String::new(),
            enable_logging: true,
        }
    }
}
