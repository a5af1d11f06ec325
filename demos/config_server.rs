//! Configuration server example
//!
//! Serves `GET`/`PUT /api/configuration`, persisted to the JSON file given
//! as the first argument (in memory if omitted).
//!
//! Run with: cargo run --example config_server -- rig.json

use rig_config_sync::{server, ConfigurationStore, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let config = ServerConfig {
        bind_addr: "127.0.0.1:9000".parse()?,
        configuration_file: std::env::args().nth(1).map(Into::into),
    };

    let store = match &config.configuration_file {
        Some(path) => ConfigurationStore::open(path).await?,
        None => ConfigurationStore::default(),
    };

    let mut changes = store.watch();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let document = changes.borrow_and_update().clone();
            tracing::info!(limits = %document["limits"], "Configuration changed");
        }
    });

    println!("Serving configuration on http://{}", config.bind_addr);
    server::serve_store(config, store).await?;
    Ok(())
}
