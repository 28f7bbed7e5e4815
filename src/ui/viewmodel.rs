//! View model types representing renderable UI state.
//!
//! View models are computed by [`AppState::compute_viewmodel`](crate::app::AppState::compute_viewmodel)
//! and consumed by the renderer. They hold display-ready data only: labels are
//! pre-formatted and permissions pre-evaluated, so the renderer never looks at
//! the domain types.

use crate::domain::{Stats, StudentStatus};
use serde::Serialize;

/// Complete student screen view model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListViewModel {
    /// Header line, including the signed-in user when known.
    pub header: HeaderInfo,

    /// Dashboard counters, once loaded.
    pub stats: Option<Stats>,

    /// e.g. `12 students found`.
    pub results_label: String,

    /// e.g. `Sorted by idade (desc)`.
    pub sort_label: String,

    /// Active filters as `(key, value)` pairs, in key order.
    pub active_filters: Vec<(String, String)>,

    /// Cards of the visible page.
    pub cards: Vec<StudentCard>,

    pub pagination: PaginationBar,

    /// Shown instead of the cards when the derived set is empty.
    pub empty_state: Option<EmptyState>,

    /// Title of the open modal, if any.
    pub modal_title: Option<String>,

    /// A student list fetch is in flight.
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    pub title: String,
    pub user_label: Option<String>,
}

/// One student on the visible page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentCard {
    pub id: i64,
    pub name: String,

    /// Character indices of `name` matched by the search box.
    pub highlight: Vec<usize>,

    /// e.g. `12 years`.
    pub age_label: String,
    pub status: StudentStatus,

    /// Class name, or `No class`.
    pub class_label: String,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// Enrollment is offered only to inactive students.
    pub can_enroll: bool,

    /// Deletion is offered only to administrators.
    pub can_delete: bool,
}

/// Previous / next controls and the page indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationBar {
    /// e.g. `Page 2 of 3`.
    pub label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Message shown when no student matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
