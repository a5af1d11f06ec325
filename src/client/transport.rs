//! Transport capability and its HTTP implementation.
//!
//! The write queue only needs two operations on a remote resource: read the
//! whole document and write a partial one. [`Transport`] captures exactly
//! that, so tests and alternative carriers can stand in for HTTP.
//!
//! # Examples
//!
//! ```ignore
//! use rig_config_sync::client::{HttpTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new()?;
//!     let url = "http://localhost:9000/api/configuration";
//!     let current = transport.get(url).await?;
//!     println!("limits: {}", current["limits"]);
//!     Ok(())
//! }
//! ```

use crate::client::config::ClientConfig;
use crate::client::utils::is_success_status;
use crate::error::{Result, SyncError};
use crate::protocol::{encode_document, JSON_CONTENT_TYPE};
use crate::types::Document;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Read and write access to remote configuration resources.
///
/// `put` resolving, successfully or not, is what the queue treats as the
/// completion of a write.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Fetch the current document at `url`.
    async fn get(&self, url: &str) -> Result<Document>;

    /// Write `document` to `url`.
    async fn put(&self, url: &str, document: &Document) -> Result<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str) -> Result<Document> {
        (**self).get(url).await
    }

    async fn put(&self, url: &str, document: &Document) -> Result<()> {
        (**self).put(url, document).await
    }
}

/// JSON-over-HTTP transport backed by `reqwest`.
///
/// `get` issues `GET` and parses the body; `put` issues `PUT` with a JSON
/// body. Non-2xx answers become [`SyncError::TransportFailure`]. Requests
/// are never retried.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a transport with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// [`SyncError::Http`] if `proxy_url` is not a valid proxy or the HTTP
    /// client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90));

        if !config.proxy_url.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy_url).map_err(|e| {
                tracing::error!("Invalid proxy {}: {}", config.proxy_url, e);
                SyncError::Http(format!("invalid proxy {}: {}", config.proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(HttpTransport {
            client,
            config: Arc::new(config),
        })
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn failure(response: reqwest::Response) -> SyncError {
        let status = response.status();
        let message = match response.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => status.canonical_reason().unwrap_or("unknown").to_string(),
        };
        SyncError::TransportFailure {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Document> {
        let response = self.client.get(url).send().await?;

        if !is_success_status(response.status().as_u16()) {
            return Err(Self::failure(response).await);
        }

        let document = response.json::<Document>().await?;
        if self.config.enable_logging {
            tracing::debug!(url, "Fetched configuration");
        }
        Ok(document)
    }

    async fn put(&self, url: &str, document: &Document) -> Result<()> {
        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(encode_document(document)?)
            .send()
            .await?;
        let status = response.status().as_u16();

        if !is_success_status(status) {
            return Err(Self::failure(response).await);
        }

        if self.config.enable_logging {
            tracing::debug!(url, status, "Wrote configuration");
        }
        Ok(())
    }
}
