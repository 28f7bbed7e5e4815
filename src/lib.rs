//! Roster: client core for a school-management API.
//!
//! The heart of the crate is [`listview::ListViewState`], a synchronous engine
//! that holds a full record set and derives the visible page from a filter
//! spec, a sort spec and a page state. Around it sit the layers a complete
//! client needs:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  CLI driver (main.rs)                                │
//! └──────────────────────────────────────────────────────┘
//!                         │
//! ┌──────────────────────────────────────────────────────┐
//! │  app/    Event → handle_event → AppState → Actions   │
//! └──────────────────────────────────────────────────────┘
//!     │            │             │            │
//! ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌──────────┐
//! │listview/│ │ service/ │ │ storage/  │ │ export/  │
//! │ engine  │ │ API +    │ │ sort pref │ │ CSV/JSON │
//! │         │ │ worker   │ │ JSON file │ │          │
//! └─────────┘ └──────────┘ └───────────┘ └──────────┘
//!                         │
//! ┌──────────────────────────────────────────────────────┐
//! │  ui/ view models + text renderer                     │
//! │  domain/ infrastructure/ observability/              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use roster::app::Event;
//! use roster::domain::{Role, User};
//! use roster::{handle_event, initialize, Config};
//!
//! let mut state = initialize(&Config::default())?;
//! let user = User { id: 1, username: "secretaria".into(), role: Role::Admin, display_name: None };
//! let (_, actions) = handle_event(&mut state, &Event::LoggedIn(user))?;
//! assert!(!actions.is_empty());
//! # Ok::<(), roster::RosterError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod listview;
pub mod observability;
pub mod service;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{Result, RosterError, Student};
pub use listview::ListViewState;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_SORT: &str = "nome";

/// Client configuration.
///
/// Read from a TOML file or a flat key/value map; missing keys take their
/// defaults.
///
/// ```toml
/// page_size = 20
/// fuzzy_search = true
/// data_dir = "~/.roster"
/// trace_level = "debug"
/// default_sort = "idade"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Records per page. Must be positive. Default: 10
    pub page_size: usize,

    /// Use fuzzy matching for the search box instead of substring matching.
    pub fuzzy_search: bool,

    /// Directory for preferences and trace output. Defaults to the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,

    /// Tracing filter directive, e.g. `debug` or `roster=trace`.
    pub trace_level: Option<String>,

    /// Sort field used until a preference is restored. Default: `nome`
    pub default_sort: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fuzzy_search: false,
            data_dir: None,
            trace_level: None,
            default_sort: DEFAULT_SORT.to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map.
    ///
    /// Unparseable values fall back to their defaults. `fuzzy_search` accepts
    /// `true`/`false`/`1`/`0`/`yes`/`no`.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use roster::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "25".to_string());
    /// map.insert("fuzzy_search".to_string(), "yes".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 25);
    /// assert!(config.fuzzy_search);
    /// assert_eq!(config.default_sort, "nome");
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let page_size = get("page_size")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let fuzzy_search = get("fuzzy_search")
            .and_then(|s| match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            })
            .unwrap_or(false);

        Self {
            page_size,
            fuzzy_search,
            data_dir: get("data_dir").map(PathBuf::from),
            trace_level: get("trace_level").map(str::to_string),
            default_sort: get("default_sort").unwrap_or(DEFAULT_SORT).to_string(),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`] on malformed TOML or mistyped values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RosterError::Config(format!("invalid config: {e}")))
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        tracing::debug!(?path, "loading config file");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Creates the application state for `config`.
///
/// Tracing is not installed here; binaries call
/// [`observability::init_tracing`] first when they want span output.
///
/// # Errors
///
/// Returns [`RosterError::Config`] when the page size is zero.
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(
        page_size = config.page_size,
        fuzzy = config.fuzzy_search,
        sort = %config.default_sort,
        "initializing roster"
    );
    AppState::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_map_values_fall_back_to_defaults() {
        let map: BTreeMap<String, String> = [
            ("page_size", "many"),
            ("fuzzy_search", "maybe"),
            ("default_sort", "  "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(Config::from_map(&map), Config::default());
    }

    #[test]
    fn toml_fills_missing_keys_with_defaults() {
        let config = Config::from_toml_str("page_size = 5\ndata_dir = \"/srv/roster\"\n").unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/roster")));
        assert_eq!(config.default_sort, "nome");
        assert!(!config.fuzzy_search);
    }

    #[test]
    fn mistyped_toml_is_a_config_error() {
        assert!(matches!(
            Config::from_toml_str("page_size = \"ten\""),
            Err(RosterError::Config(_))
        ));
    }

    #[test]
    fn zero_page_size_fails_fast() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(matches!(initialize(&config), Err(RosterError::Config(_))));
    }
}
