//! JSON file preference store.
//!
//! The whole document is kept in memory and rewritten on every change using an
//! atomic write (write to a temporary file, then rename), so a crash never
//! leaves a half-written file behind.

use super::backend::PreferenceStore;
use super::models::{PreferenceDocument, SortPreference, PREFERENCES_VERSION};
use crate::domain::{Result, RosterError};
use crate::listview::SortSpec;
use std::path::{Path, PathBuf};

/// JSON file implementation of [`PreferenceStore`].
///
/// `Send` but not `Sync`: owned by the single thread that applies actions.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    file_path: PathBuf,
    data: PreferenceDocument,
    dirty: bool,
}

impl JsonPreferenceStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty document; nothing is written until the
    /// first change.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory can't be created, or the file
    /// exists but is unreadable, malformed, or from a newer format version.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening preference store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no preference file yet, starting empty");
            PreferenceDocument::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<PreferenceDocument> {
        let contents = std::fs::read_to_string(path)?;
        let data: PreferenceDocument = serde_json::from_str(&contents)
            .map_err(|e| RosterError::Storage(format!("failed to parse preferences: {e}")))?;

        if data.version > PREFERENCES_VERSION {
            return Err(RosterError::Storage(format!(
                "preferences version {} is newer than supported version {PREFERENCES_VERSION}",
                data.version
            )));
        }

        tracing::debug!(version = data.version, lists = data.sort.len(), "preferences loaded");
        Ok(data)
    }

    /// Writes the document if it changed since the last save.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file can't be written or renamed.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| RosterError::Storage(format!("failed to serialize preferences: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "preferences saved");
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load_sort(&self, list: &str) -> Result<Option<SortSpec>> {
        let spec = self.data.sort.get(list).map(|pref| pref.spec.clone());
        tracing::debug!(list, found = spec.is_some(), "sort preference lookup");
        Ok(spec)
    }

    fn save_sort(&mut self, list: &str, spec: &SortSpec) -> Result<()> {
        let _span = tracing::debug_span!(
            "save_sort",
            list,
            field = %spec.field,
            direction = spec.direction.as_str()
        )
        .entered();

        if self.data.sort.get(list).is_some_and(|pref| pref.spec == *spec) {
            return Ok(());
        }
        self.data
            .sort
            .insert(list.to_string(), SortPreference::now(spec.clone()));
        self.dirty = true;
        self.flush()
    }

    fn clear_sort(&mut self, list: &str) -> Result<()> {
        if self.data.sort.remove(list).is_some() {
            self.dirty = true;
            self.flush()?;
        }
        Ok(())
    }
}

impl Drop for JsonPreferenceStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty preferences on drop");
            if let Err(e) = self.flush() {
                tracing::error!(error = %e, "failed to save preferences on drop");
            }
        }
    }
}
