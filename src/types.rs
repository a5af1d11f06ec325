//! Core document types.
//!
//! A [`Document`] is any JSON tree. Interior nodes are objects; everything
//! else (numbers, strings, booleans, `null`, arrays) is a leaf that merges
//! by wholesale replacement. [`Shape`] makes that classification explicit so
//! merge code dispatches on a tag instead of poking at value internals.
//!
//! An [`Edit`] is a partial document that is an object at its top level.
//! Absent keys mean "unchanged" and `null` means "explicitly cleared".

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A configuration document, or any node of one.
pub type Document = Value;

/// Merge-relevant classification of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A keyed record; merged key by key.
    Mapping,
    /// A number, string, boolean or `null`.
    Scalar,
    /// An ordered list; never merged element-wise.
    Sequence,
}

impl Shape {
    /// Classify a node.
    pub fn of(value: &Value) -> Shape {
        match value {
            Value::Object(_) => Shape::Mapping,
            Value::Array(_) => Shape::Sequence,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Shape::Scalar,
        }
    }

    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Mapping => "mapping",
            Shape::Scalar => "scalar",
            Shape::Sequence => "sequence",
        }
    }
}

/// A partial update to a configuration document.
///
/// The top level is always an object, so an `Edit` can never be a bare
/// scalar or array.
///
/// # Examples
///
/// ```
/// use rig_config_sync::Edit;
/// use serde_json::json;
///
/// let edit = Edit::at(["limits", "pan"], json!([-90, 90]));
/// assert_eq!(edit.into_document(), json!({"limits": {"pan": [-90, 90]}}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Edit(Map<String, Value>);

impl Edit {
    /// An edit that changes nothing.
    pub fn new() -> Self {
        Edit(Map::new())
    }

    /// Build an edit that sets `value` at the nested key `path`.
    ///
    /// An empty path has no key to assign; if `value` is an object it becomes
    /// the edit, otherwise the result is empty.
    pub fn at<I, K>(path: I, value: Value) -> Self
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: DoubleEndedIterator,
        K: Into<String>,
    {
        let mut node = value;
        for key in path.into_iter().rev() {
            let mut map = Map::new();
            map.insert(key.into(), node);
            node = Value::Object(map);
        }
        match node {
            Value::Object(map) => Edit(map),
            _ => Edit::new(),
        }
    }

    /// Set a top-level key, returning the edit for chaining.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Merge `other` on top of this edit.
    pub fn merge(&mut self, other: &Edit) {
        crate::merge::merge_into(&mut self.0, &other.0);
    }

    /// Whether the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Borrow the underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Convert into a [`Document`].
    pub fn into_document(self) -> Document {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Edit {
    fn from(map: Map<String, Value>) -> Self {
        Edit(map)
    }
}

impl TryFrom<Value> for Edit {
    type Error = SyncError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Edit(map)),
            other => Err(SyncError::InvalidEdit(Shape::of(&other).name())),
        }
    }
}

impl From<Edit> for Value {
    fn from(edit: Edit) -> Self {
        edit.into_document()
    }
}
