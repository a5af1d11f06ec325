#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Rig configuration synchronizer
//!
//! A camera rig's remote-control UI is made of independent widgets: color
//! range pickers, pan/tilt limit editors, search-strategy editors. Each one
//! edits a slice of the same remote configuration document, often several
//! times a second while a slider is dragged. This crate keeps those writes
//! orderly:
//!
//! - **At most one write in flight** per resource.
//! - **No lost updates**: edits made while a write is outstanding are merged
//!   and sent as soon as it resolves.
//! - **A well-defined merge**: objects merge key by key, everything else
//!   (scalars, `null`, arrays such as `[min, max]` ranges) replaces wholesale.
//!
//! ## Client Usage
//!
//! ```ignore
//! use rig_config_sync::{CoalescingWriteQueue, Edit, EditSink, HttpTransport, Transport};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> rig_config_sync::Result<()> {
//!     let url = "http://localhost:9000/api/configuration";
//!     let transport = Arc::new(HttpTransport::new()?);
//!
//!     // Producers read the initial state once...
//!     let initial = transport.get(url).await?;
//!     println!("pan limits: {}", initial["limits"]["pan"]);
//!
//!     // ...and push partial edits through the queue.
//!     let queue = CoalescingWriteQueue::new(url, transport)?;
//!     let sink: Arc<dyn EditSink> = Arc::new(queue.clone());
//!     sink.add(Edit::at(["limits", "pan"], json!([-90, 90])));
//!     sink.add(Edit::at(["limits", "tilt"], json!([-10, 30])));
//!
//!     queue.flushed().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Server Usage
//!
//! ```ignore
//! use rig_config_sync::{server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> rig_config_sync::Result<()> {
//!     server::serve(ServerConfig {
//!         configuration_file: Some("rig.json".into()),
//!         ..Default::default()
//!     })
//!     .await
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Document, Shape and Edit
//! - **[error]** - Error types and result handling
//! - **[merge]** - Structural merge of partial documents
//! - **[queue]** - Coalescing write queue and write reports
//! - **[client]** - Transport capability and HTTP implementation
//! - **[server]** - Configuration resource server (Axum)
//! - **[protocol]** - Resource path and body encoding

pub mod client;
pub mod error;
pub mod merge;
pub mod protocol;
pub mod queue;
pub mod server;
pub mod types;

pub use client::{HttpTransport, Transport};
pub use error::{Result, SyncError};
pub use queue::{CoalescingWriteQueue, EditSink, QueueState, WriteOutcome, WriteReport};
pub use server::{ConfigurationStore, ServerConfig};
pub use types::{Document, Edit, Shape};

#[cfg(test)]
mod tests;
