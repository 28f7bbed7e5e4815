//! Platform paths for configuration, preferences and trace output.

use crate::domain::{Result, RosterError};
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

/// File name of the persisted UI preferences inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// File name of the OTLP trace output inside the data directory.
pub const TRACE_FILE: &str = "otlp.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "roster", "roster")
}

/// Platform data directory, e.g. `~/.local/share/roster` on Linux.
///
/// # Errors
///
/// Returns [`RosterError::Config`] when no home directory can be resolved.
pub fn default_data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .ok_or_else(|| RosterError::Config("unable to resolve data directory".to_string()))
}

/// Default location of the TOML configuration file, if a home directory exists.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Resolves the data directory: an explicit override wins over the platform default.
///
/// # Errors
///
/// Returns [`RosterError::Config`] when there is no override and no home directory.
pub fn resolve_data_dir(configured: Option<&Path>) -> Result<PathBuf> {
    configured.map_or_else(default_data_dir, |path| Ok(expand_tilde(path)))
}

#[must_use]
pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE)
}

#[must_use]
pub fn trace_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or with no resolvable home, are returned as-is.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    BaseDirs::new().map_or_else(|| path.to_path_buf(), |dirs| dirs.home_dir().join(rest))
}
