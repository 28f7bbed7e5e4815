//! Side effects emitted by the event handler.
//!
//! The handler never performs I/O itself. It returns a `Vec<Action>` that the
//! runtime executes in order: requests go to the API worker, preferences to
//! the [`PreferenceStore`](crate::storage::PreferenceStore), notifications to
//! whatever shows them.

use crate::export::ExportFile;
use crate::listview::SortSpec;
use crate::service::ApiRequest;
use serde::Serialize;

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short message for the user (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Commands executed by the runtime after an event is handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Sends a request to the API worker.
    Dispatch(ApiRequest),

    /// Persists the sort order of the student list.
    SaveSortPreference(SortSpec),

    /// Shows a notification.
    Notify(Notification),

    /// Writes a rendered export to disk.
    WriteExport(ExportFile),
}
