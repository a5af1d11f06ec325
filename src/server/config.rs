//! Configuration server settings.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Settings for [`serve`](super::serve).
///
/// # Examples
///
/// ```
/// use rig_config_sync::ServerConfig;
///
/// let config = ServerConfig {
///     configuration_file: Some("rig.json".into()),
///     ..Default::default()
/// };
/// assert_eq!(config.bind_addr.port(), 9000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// JSON file the configuration is persisted in; `None` keeps it in memory.
    pub configuration_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9000)),
            configuration_file: None,
        }
    }
}
