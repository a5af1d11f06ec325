use crate::error::{Result, SyncError};
use crate::types::{Document, Shape};
use serde_json::{Map, Value};

/// Keys that are never written by a merge.
///
/// They name the prototype, constructor and prototype-descriptor slots of
/// prototype-based object models. Configuration documents are shared with
/// such clients, so these keys are dropped rather than stored.
pub const DENYLISTED_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Whether `key` is in [`DENYLISTED_KEYS`].
#[inline]
pub fn is_denylisted(key: &str) -> bool {
    DENYLISTED_KEYS.contains(&key)
}

/// Merge `edit` into `base` in place.
pub fn merge_into(base: &mut Map<String, Value>, edit: &Map<String, Value>) {
    for (key, value) in edit {
        if is_denylisted(key) {
            continue;
        }
        match (base.get_mut(key), value) {
            (Some(Value::Object(base_child)), Value::Object(edit_child)) => {
                merge_into(base_child, edit_child);
            }
            (_, Value::Object(edit_child)) => {
                let mut fresh = Map::new();
                merge_into(&mut fresh, edit_child);
                base.insert(key.clone(), Value::Object(fresh));
            }
            (_, leaf) => {
                base.insert(key.clone(), leaf.clone());
            }
        }
    }
}

/// Apply `edits` on top of `base`, left to right, and return the mutated base.
///
/// Both `base` and every edit must be objects; anything else is a
/// [`SyncError::MergeTypeMismatch`] and leaves `base` untouched by that edit.
pub fn merge<'a, I>(base: &mut Document, edits: I) -> Result<&mut Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    for edit in edits {
        match (&mut *base, edit) {
            (Value::Object(base_map), Value::Object(edit_map)) => merge_into(base_map, edit_map),
            (base, edit) => {
                return Err(SyncError::MergeTypeMismatch {
                    base: Shape::of(base).name(),
                    edit: Shape::of(edit).name(),
                })
            }
        }
    }
    Ok(base)
}

/// Merge `edits` into a fresh empty object.
pub fn merged<'a, I>(edits: I) -> Result<Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut base = Value::Object(Map::new());
    merge(&mut base, edits)?;
    Ok(base)
}
