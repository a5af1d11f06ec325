//! Client side of the configuration resource.
//!
//! This module provides the [`Transport`] capability consumed by the write
//! queue and by producers that read the initial document, plus an HTTP
//! implementation of it.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── transport - Transport trait and HttpTransport
//! ├── config    - ClientConfig
//! └── utils     - status classification and URL helpers
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Transport`] | `get`/`put` access to a remote document |
//! | [`HttpTransport`] | JSON-over-HTTP transport (reqwest) |
//! | [`ClientConfig`] | Transport configuration options |
//!
//! # Examples
//!
//! ```
//! use rig_config_sync::client::{ClientConfig, HttpTransport};
//!
//! let transport = HttpTransport::with_config(ClientConfig {
//!     request_timeout_ms: 2_000,
//!     ..Default::default()
//! })
//! .unwrap();
//! assert_eq!(transport.config().request_timeout_ms, 2_000);
//! ```

mod config;
mod transport;
mod utils;

pub use config::ClientConfig;
pub use transport::{HttpTransport, Transport};
pub use utils::*;
