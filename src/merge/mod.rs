//! Structural merge of partial configuration documents.
//!
//! Two partial documents combine key by key: objects merge recursively so
//! sibling keys survive at every depth, while scalars, `null` and arrays
//! replace their counterpart wholesale. Arrays carry tuples such as a
//! `[min, max]` range, which have no meaningful element-wise merge.
//!
//! | Edit value | Base value | Result |
//! |------------|------------|--------|
//! | object | object | recursive merge in place |
//! | object | anything else / absent | fresh object built from the edit |
//! | scalar, `null`, array | anything | edit value replaces base |
//!
//! Keys in [`DENYLISTED_KEYS`] are skipped at every depth.
//!
//! # Examples
//!
//! ```
//! use rig_config_sync::merge::merged;
//! use serde_json::json;
//!
//! let result = merged([
//!     &json!({"a": {"x": 1, "y": 2}, "range": [0, 10]}),
//!     &json!({"a": {"x": 9}, "range": [5]}),
//! ])
//! .unwrap();
//! assert_eq!(result, json!({"a": {"x": 9, "y": 2}, "range": [5]}));
//! ```

mod structural;

pub use structural::{is_denylisted, merge, merge_into, merged, DENYLISTED_KEYS};
