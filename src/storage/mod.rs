//! Persisted UI preferences.
//!
//! - `backend`: [`PreferenceStore`] trait
//! - `json`: JSON file implementation with atomic writes
//! - `models`: on-disk document types

pub mod backend;
pub mod json;
pub mod models;

pub use backend::PreferenceStore;
pub use json::JsonPreferenceStore;
pub use models::{PreferenceDocument, SortPreference, PREFERENCES_VERSION};
