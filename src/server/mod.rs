//! Configuration resource server (Axum).
//!
//! Serves the document producers edit and applies their partial writes
//! with the same structural merge the client queue uses.
//!
//! # Usage
//!
//! ```ignore
//! use rig_config_sync::{server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> rig_config_sync::Result<()> {
//!     server::serve(ServerConfig::default()).await
//! }
//! ```
//!
//! Or mount the routes into a larger application:
//!
//! ```ignore
//! use rig_config_sync::server::{router, ConfigurationStore};
//!
//! let app = router(ConfigurationStore::open("rig.json").await?);
//! ```

mod config;
mod routes;
mod store;

pub use config::ServerConfig;
pub use routes::router;
pub use store::{default_configuration, default_limits, ConfigurationStore};

use crate::error::Result;

/// Open the configured store and serve it until the listener fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let store = match &config.configuration_file {
        Some(path) => ConfigurationStore::open(path).await?,
        None => ConfigurationStore::default(),
    };
    serve_store(config, store).await
}

/// Serve an existing store.
pub async fn serve_store(config: ServerConfig, store: ConfigurationStore) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Serving configuration");
    axum::serve(listener, router(store)).await?;
    Ok(())
}
