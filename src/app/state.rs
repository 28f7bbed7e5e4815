//! Application state and view model computation.
//!
//! [`AppState`] is the single source of truth of the client. Core data (the
//! student list engine, classes, the signed-in user) lives next to transient UI
//! state (open modal, loading flag). View models are computed on demand from a
//! state snapshot.

use super::modes::{Modal, Screen};
use super::schema::{self, student_schema};
use crate::domain::{Grade, Guardian, Result, SchoolClass, Stats, Student, StudentStatus, User};
use crate::listview::{FilterKind, ListViewState, SortDirection};
use crate::service::{ApiRequest, FetchSequencer, StudentQuery};
use crate::ui::viewmodel::{EmptyState, HeaderInfo, ListViewModel, PaginationBar, StudentCard};
use crate::Config;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The student list engine.
    pub list: ListViewState<Student>,

    /// Classes for the class filter and the enroll form.
    pub classes: Vec<SchoolClass>,

    /// Guardians of the student shown in the details modal.
    pub guardians: Vec<Guardian>,

    /// Grades of the student shown in the details modal.
    pub grades: Vec<Grade>,

    pub stats: Option<Stats>,

    pub user: Option<User>,

    pub screen: Screen,

    pub modal: Option<Modal>,

    /// Orders student list fetches; stale responses are dropped.
    pub sequencer: FetchSequencer,

    /// A student list fetch is in flight.
    pub loading: bool,
}

impl AppState {
    /// Creates an empty state on the login screen.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`](crate::RosterError::Config) when the
    /// configured page size is zero.
    pub fn new(config: &Config) -> Result<Self> {
        let mut list = ListViewState::new(student_schema(config.fuzzy_search), config.page_size)?;
        list.set_sort(&config.default_sort, SortDirection::Asc);

        Ok(Self {
            list,
            classes: Vec::new(),
            guardians: Vec::new(),
            grades: Vec::new(),
            stats: None,
            user: None,
            screen: Screen::Login,
            modal: None,
            sequencer: FetchSequencer::default(),
            loading: false,
        })
    }

    /// Requests that reload everything the student screen shows.
    ///
    /// The student list is fetched unfiltered; filters apply client-side.
    pub fn refresh_requests(&mut self) -> Vec<ApiRequest> {
        let seq = self.sequencer.issue();
        self.loading = true;
        tracing::debug!(seq, "refresh requested");
        vec![
            ApiRequest::load_students(seq, StudentQuery::all()),
            ApiRequest::load_classes(),
            ApiRequest::load_stats(),
        ]
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Student targeted by the open modal, if it still exists.
    #[must_use]
    pub fn modal_student(&self) -> Option<&Student> {
        self.modal
            .and_then(|modal| modal.student_id())
            .and_then(|id| self.list.find(id))
    }

    /// Computes the student screen view model.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ListViewModel {
        let info = self.list.pagination_info();
        let sort = self.list.sort();
        let is_admin = self.is_admin();
        let highlighter = Highlighter::new(&self.list);

        let cards = self
            .list
            .visible_page()
            .iter()
            .map(|student| StudentCard {
                id: student.id,
                name: student.name.clone(),
                highlight: highlighter.indices(&student.name),
                age_label: format!("{} years", student.age),
                status: student.status,
                class_label: student
                    .class_name
                    .clone()
                    .unwrap_or_else(|| "No class".to_string()),
                email: student.email.clone(),
                phone: student.phone.clone(),
                can_enroll: student.status == StudentStatus::Inactive,
                can_delete: is_admin,
            })
            .collect();

        let noun = if info.total_count == 1 {
            "student found"
        } else {
            "students found"
        };

        let empty_state = (info.total_count == 0 && !self.loading).then(|| EmptyState {
            message: "No students found".to_string(),
            subtitle: if self.list.filters().is_empty() {
                "Add a student to get started".to_string()
            } else {
                "Try adjusting the search or filters".to_string()
            },
        });

        ListViewModel {
            header: HeaderInfo {
                title: "Students".to_string(),
                user_label: self.user.as_ref().map(|u| {
                    let name = u.display_name.as_deref().unwrap_or(&u.username);
                    if u.is_admin() {
                        format!("{name} (admin)")
                    } else {
                        name.to_string()
                    }
                }),
            },
            stats: self.stats,
            results_label: format!("{} {noun}", info.total_count),
            sort_label: format!("Sorted by {} ({})", sort.field, sort.direction.as_str()),
            active_filters: self
                .list
                .filters()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            cards,
            pagination: PaginationBar {
                label: format!("Page {} of {}", info.current_page, info.total_pages),
                prev_enabled: info.has_prev(),
                next_enabled: info.has_next(),
            },
            empty_state,
            modal_title: self.modal.map(|modal| match self.modal_student() {
                Some(student) => format!("{}: {}", modal.title(), student.name),
                None => modal.title().to_string(),
            }),
            loading: self.loading,
        }
    }
}

/// Marks the characters of a name matched by the active search.
struct Highlighter {
    kind: FilterKind,
    query: Option<String>,
    matcher: SkimMatcherV2,
}

impl Highlighter {
    fn new(list: &ListViewState<Student>) -> Self {
        Self {
            kind: list.schema().filter_def(schema::SEARCH).kind,
            query: list.filters().get(schema::SEARCH).map(str::to_string),
            matcher: SkimMatcherV2::default(),
        }
    }

    fn indices(&self, name: &str) -> Vec<usize> {
        let Some(query) = self.query.as_deref() else {
            return Vec::new();
        };

        match self.kind {
            FilterKind::Fuzzy => {
                let mut all = BTreeSet::new();
                for token in query.split_whitespace() {
                    if let Some((_, indices)) = self.matcher.fuzzy_indices(name, token) {
                        all.extend(indices);
                    }
                }
                all.into_iter().collect()
            }
            FilterKind::Contains => substring_indices(name, query),
            FilterKind::Equals => Vec::new(),
        }
    }
}

/// Character indices of the first case-insensitive occurrence of `needle`.
fn substring_indices(haystack: &str, needle: &str) -> Vec<usize> {
    let hay: Vec<char> = haystack.chars().flat_map(char::to_lowercase).collect();
    let pat: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();

    // Lowercasing can change the character count; skip highlighting then.
    if pat.is_empty() || hay.len() != haystack.chars().count() {
        return Vec::new();
    }

    hay.windows(pat.len())
        .position(|window| window == pat.as_slice())
        .map(|start| (start..start + pat.len()).collect())
        .unwrap_or_default()
}
