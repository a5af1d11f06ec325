//! Server-side configuration state with optional file persistence.
//!
//! The store holds the one configuration document the rig is driven by.
//! Every applied edit goes through the same structural merge the client
//! queue uses, so sibling keys survive partial updates. When backed by a
//! file, the document is rewritten after every edit. Rig components that
//! act on the configuration follow it through [`ConfigurationStore::watch`].
//!
//! The document lock only ever guards the in-memory merge; file I/O runs
//! on `tokio::fs` behind a separate async mutex that keeps writes ordered.

use crate::error::Result;
use crate::merge::merge_into;
use crate::types::{Document, Edit};
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// The document a fresh rig starts with.
///
/// # Examples
///
/// ```
/// use rig_config_sync::server::default_configuration;
///
/// let config = default_configuration();
/// assert_eq!(config["tracking"]["color"]["min_hsv"][0], 69);
/// ```
pub fn default_configuration() -> Document {
    json!({
        "tracking": {
            "color": {
                "is_single_object_detection": true,
                "min_hsv": [69, 30, 114],
                "max_hsv": [100, 255, 255],
            }
        }
    })
}

/// The `limits` section served when the document has none.
///
/// Limit editors read it at startup; `null` means "no limit".
pub fn default_limits() -> Document {
    json!({
        "areLimitsAppliedInManualMode": false,
        "pan": null,
        "tilt": null,
    })
}

fn with_limits(mut document: Map<String, Value>) -> Map<String, Value> {
    document.entry("limits").or_insert_with(default_limits);
    document
}

/// Thread-safe handle to the configuration document.
///
/// Cloning creates another handle to the same document.
///
/// # Examples
///
/// ```
/// use rig_config_sync::server::ConfigurationStore;
/// use rig_config_sync::Edit;
/// use serde_json::json;
///
/// tokio_test::block_on(async {
///     let store = ConfigurationStore::in_memory(json!({"limits": {"pan": [0, 10]}})).unwrap();
///     store.apply(&Edit::at(["limits", "tilt"], json!([-5, 5]))).await.unwrap();
///     assert_eq!(
///         store.snapshot(),
///         json!({"limits": {"pan": [0, 10], "tilt": [-5, 5]}})
///     );
/// });
/// ```
#[derive(Clone)]
pub struct ConfigurationStore {
    document: Arc<RwLock<Map<String, Value>>>,
    file: Option<PathBuf>,
    persist: Arc<Mutex<()>>,
    changes: Arc<watch::Sender<Document>>,
}

impl ConfigurationStore {
    /// Create a store that lives only in memory.
    ///
    /// # Errors
    ///
    /// [`SyncError::InvalidEdit`](crate::SyncError::InvalidEdit) if `initial`
    /// is not a JSON object.
    pub fn in_memory(initial: Document) -> Result<Self> {
        let document = Edit::try_from(initial)?.into_map();
        Ok(Self::from_parts(document, None))
    }

    /// Open a file-backed store.
    ///
    /// Reads `path` if it exists; otherwise writes [`default_configuration`]
    /// to it and starts from that. A missing `limits` section is filled in
    /// with [`default_limits`].
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let document = if tokio::fs::try_exists(path).await? {
            let raw = tokio::fs::read(path).await?;
            Edit::try_from(serde_json::from_slice::<Value>(&raw)?)?.into_map()
        } else {
            let initial = Edit::try_from(default_configuration())?.into_map();
            write_file(path, &initial).await?;
            tracing::info!(path = %path.display(), "Created configuration file");
            initial
        };

        Ok(Self::from_parts(with_limits(document), Some(path.to_path_buf())))
    }

    fn from_parts(document: Map<String, Value>, file: Option<PathBuf>) -> Self {
        let (changes, _) = watch::channel(Value::Object(document.clone()));
        Self {
            document: Arc::new(RwLock::new(document)),
            file,
            persist: Arc::new(Mutex::new(())),
            changes: Arc::new(changes),
        }
    }

    /// A copy of the current document.
    pub fn snapshot(&self) -> Document {
        Value::Object(self.document.read().clone())
    }

    /// Merge `edit` into the document and return the result.
    ///
    /// The in-memory document is updated even if persisting it fails; the
    /// error is still returned.
    pub async fn apply(&self, edit: &Edit) -> Result<Document> {
        let document = {
            let mut current = self.document.write();
            merge_into(&mut current, edit.as_map());
            Value::Object(current.clone())
        };
        self.changes.send_replace(document.clone());
        tracing::debug!(keys = edit.len(), "Applied configuration edit");

        if let Some(file) = &self.file {
            // Whoever holds the lock writes the newest state, so the file
            // never ends up behind memory.
            let _ordered = self.persist.lock().await;
            let latest = self.document.read().clone();
            write_file(file, &latest).await?;
        }

        Ok(document)
    }

    /// Follow the document as edits are applied.
    ///
    /// The receiver starts at the current document.
    pub fn watch(&self) -> watch::Receiver<Document> {
        self.changes.subscribe()
    }

    /// The backing file, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

impl Default for ConfigurationStore {
    /// An in-memory store holding [`default_configuration`] plus
    /// [`default_limits`].
    fn default() -> Self {
        let document = match default_configuration() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::from_parts(with_limits(document), None)
    }
}

async fn write_file(path: &Path, document: &Map<String, Value>) -> Result<()> {
    let body = serde_json::to_vec_pretty(document)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}
