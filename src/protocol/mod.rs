//! Wire conventions for the configuration resource.
//!
//! The resource is a single JSON document at [`CONFIGURATION_PATH`].
//!
//! | Method | Body | Meaning |
//! |--------|------|---------|
//! | `GET` | none | returns the full document |
//! | `PUT` | JSON object | merges the partial edit into the document |
//!
//! A `PUT` body that is not a JSON object is rejected; there is no merge
//! semantics for a bare scalar or array at the top level.
//!
//! # Examples
//!
//! ```
//! use rig_config_sync::protocol::{decode_edit, encode_document};
//! use serde_json::json;
//!
//! let edit = decode_edit(br#"{"limits": {"pan": [-90, 90]}}"#).unwrap();
//! assert_eq!(edit.len(), 1);
//!
//! assert!(decode_edit(b"[1, 2]").is_err());
//!
//! let body = encode_document(&json!({"h": 10})).unwrap();
//! assert_eq!(body, br#"{"h":10}"#.to_vec());
//! ```

use crate::error::Result;
use crate::types::{Document, Edit};

/// Path of the configuration resource on the server.
pub const CONFIGURATION_PATH: &str = "/api/configuration";

/// Media type of request and response bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Parse a request body into an [`Edit`].
///
/// # Errors
///
/// Returns [`SyncError::Json`](crate::SyncError::Json) for malformed JSON and
/// [`SyncError::InvalidEdit`](crate::SyncError::InvalidEdit) when the body is
/// valid JSON but not an object.
pub fn decode_edit(body: &[u8]) -> Result<Edit> {
    let value: Document = serde_json::from_slice(body)?;
    Edit::try_from(value)
}

/// Serialize a document as a compact JSON body.
#[inline]
pub fn encode_document(document: &Document) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}
