//! On-disk preference document.
//!
//! Kept separate from the list view types so the file format can evolve
//! (through `version`) without touching the engine.

use crate::listview::SortSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current version of [`PreferenceDocument`].
pub const PREFERENCES_VERSION: u32 = 1;

/// A saved sort order together with when it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPreference {
    #[serde(flatten)]
    pub spec: SortSpec,

    /// Unix timestamp of the last save.
    pub saved_at: i64,
}

impl SortPreference {
    /// Wraps `spec`, stamping it with the current time.
    #[must_use]
    pub fn now(spec: SortSpec) -> Self {
        Self {
            spec,
            saved_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Top-level document serialized to the preferences file.
///
/// ```json
/// {
///   "version": 1,
///   "sort": {
///     "students": { "sortBy": "idade", "sortOrder": "desc", "saved_at": 1718000000 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDocument {
    pub version: u32,

    /// Saved sort order per list, keyed by list name.
    #[serde(default)]
    pub sort: BTreeMap<String, SortPreference>,
}

impl Default for PreferenceDocument {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            sort: BTreeMap::new(),
        }
    }
}
