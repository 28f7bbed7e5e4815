//! Preference storage abstraction.
//!
//! The list view engine persists nothing itself. The application layer saves
//! the active sort order through a [`PreferenceStore`] and restores it at
//! startup.

use crate::domain::Result;
use crate::listview::SortSpec;

/// Persistent store for UI preferences.
///
/// # Implementations
///
/// - [`JsonPreferenceStore`](super::JsonPreferenceStore): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use roster::listview::{SortDirection, SortSpec};
/// use roster::storage::{JsonPreferenceStore, PreferenceStore};
/// use std::path::PathBuf;
///
/// let mut store = JsonPreferenceStore::new(PathBuf::from("/tmp/roster/preferences.json"))?;
/// store.save_sort("students", &SortSpec::new("idade", SortDirection::Desc))?;
/// assert_eq!(store.load_sort("students")?.map(|s| s.field), Some("idade".to_string()));
/// # Ok::<(), roster::RosterError>(())
/// ```
pub trait PreferenceStore: Send {
    /// Loads the saved sort order of `list`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_sort(&self, list: &str) -> Result<Option<SortSpec>>;

    /// Saves the sort order of `list`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save_sort(&mut self, list: &str, spec: &SortSpec) -> Result<()>;

    /// Forgets the saved sort order of `list`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn clear_sort(&mut self, list: &str) -> Result<()>;
}
