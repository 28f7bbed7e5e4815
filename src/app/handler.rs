//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place where [`AppState`] changes. It returns
//! whether the view must be re-rendered plus the actions the runtime should
//! execute:
//!
//! ```text
//! Event → handle_event → state mutation → (render?, Vec<Action>)
//!   ↑                                              │
//!   └────────────── ApiResponse ◄── worker ◄───────┘
//! ```

use super::actions::{Action, Notification};
use super::modes::{Modal, Screen};
use super::schema;
use super::state::AppState;
use crate::domain::{ClassDraft, GradeDraft, GuardianDraft, Result, StudentDraft, StudentStatus, User};
use crate::export::{self, ExportFile, ExportFormat};
use crate::listview::SortSpec;
use crate::service::{ApiRequest, ApiResponse};

/// Inputs to the application: user intents and worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A user signed in.
    LoggedIn(User),
    /// The user signed out.
    LoggedOut,

    /// The search box text changed.
    SearchChanged(String),
    /// The class select changed; `None` means all classes.
    ClassFilterChanged(Option<i64>),
    /// The status select changed; `None` means any status.
    StatusFilterChanged(Option<StudentStatus>),
    ClearFilters,

    /// A sort field was picked; the direction is kept.
    SortFieldChanged(String),
    SortDirectionToggled,
    /// A saved sort order was loaded from preferences.
    SortRestored(SortSpec),

    NextPage,
    PrevPage,
    GoToPage(usize),

    /// Reload students, classes and stats.
    Refresh,

    OpenModal(Modal),
    CloseModal,

    /// Submit the student form. `id` is `None` when creating.
    SubmitStudent {
        id: Option<i64>,
        draft: StudentDraft,
    },
    SubmitClass(ClassDraft),
    EnrollStudent {
        student_id: i64,
        class_id: i64,
    },
    /// Ask to delete a student; opens the confirmation for admins.
    RequestDelete(i64),
    /// Confirm the pending deletion.
    ConfirmDelete,

    SubmitGuardian {
        student_id: i64,
        id: Option<i64>,
        draft: GuardianDraft,
    },
    DeleteGuardian(i64),
    SubmitGrade {
        student_id: i64,
        id: Option<i64>,
        draft: GradeDraft,
    },
    DeleteGrade(i64),

    /// Export the derived set (all filtered pages).
    ExportRequested(ExportFormat),

    /// A response from the API worker.
    ApiResponse(ApiResponse),
}

/// Processes an event, mutates state, and returns `(render, actions)`.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the runtime loop uniform with
/// fallible action execution.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::LoggedIn(user) => {
            tracing::debug!(username = %user.username, role = ?user.role, "user signed in");
            state.user = Some(user.clone());
            state.screen = Screen::Students;
            let actions = dispatch_all(state.refresh_requests());
            Ok((true, actions))
        }
        Event::LoggedOut => {
            state.user = None;
            state.screen = Screen::Login;
            state.modal = None;
            state.stats = None;
            state.classes.clear();
            state.list.set_records(Vec::new());
            state.list.clear_filters();
            state.sequencer.invalidate();
            state.loading = false;
            Ok((true, vec![]))
        }

        Event::SearchChanged(text) => {
            state.list.set_filter(schema::SEARCH, Some(text.trim()));
            Ok((true, vec![]))
        }
        Event::ClassFilterChanged(class_id) => {
            let value = class_id.map(|id| id.to_string());
            state.list.set_filter(schema::CLASS, value.as_deref());
            Ok((true, vec![]))
        }
        Event::StatusFilterChanged(status) => {
            state
                .list
                .set_filter(schema::STATUS, status.map(StudentStatus::as_str));
            Ok((true, vec![]))
        }
        Event::ClearFilters => {
            state.list.clear_filters();
            Ok((true, vec![]))
        }

        Event::SortFieldChanged(field) => {
            let direction = state.list.sort().direction;
            state.list.set_sort(field, direction);
            Ok((true, save_sort(state)))
        }
        Event::SortDirectionToggled => {
            let current = state.list.sort().clone();
            state.list.set_sort(&current.field, current.direction.toggled());
            Ok((true, save_sort(state)))
        }
        Event::SortRestored(spec) => {
            state.list.apply_sort(spec);
            Ok((true, vec![]))
        }

        Event::NextPage => Ok((state.list.next_page(), vec![])),
        Event::PrevPage => Ok((state.list.prev_page(), vec![])),
        Event::GoToPage(page) => {
            let before = state.list.pagination_info().current_page;
            state.list.go_to_page(*page);
            Ok((state.list.pagination_info().current_page != before, vec![]))
        }

        Event::Refresh => Ok((true, dispatch_all(state.refresh_requests()))),

        Event::OpenModal(modal) => open_modal(state, *modal),
        Event::CloseModal => {
            let was_open = state.modal.take().is_some();
            Ok((was_open, vec![]))
        }

        Event::SubmitStudent { id, draft } => {
            let today = chrono::Local::now().date_naive();
            match draft.clone().validate(today) {
                Ok(draft) => {
                    let request = match id {
                        Some(id) => ApiRequest::update_student(*id, draft),
                        None => ApiRequest::create_student(draft),
                    };
                    Ok((false, vec![Action::Dispatch(request)]))
                }
                Err(e) => Ok((false, vec![notify_error(&e)])),
            }
        }
        Event::SubmitClass(draft) => match draft.clone().validate() {
            Ok(draft) => Ok((false, vec![Action::Dispatch(ApiRequest::create_class(draft))])),
            Err(e) => Ok((false, vec![notify_error(&e)])),
        },
        Event::EnrollStudent {
            student_id,
            class_id,
        } => {
            if let Some(class) = state.classes.iter().find(|c| c.id == *class_id) {
                if !class.has_room() {
                    return Ok((
                        false,
                        vec![Action::Notify(Notification::warning(format!(
                            "Class {} is full",
                            class.name
                        )))],
                    ));
                }
            }
            Ok((
                false,
                vec![Action::Dispatch(ApiRequest::enroll(*student_id, *class_id))],
            ))
        }
        Event::RequestDelete(student_id) => {
            if !state.is_admin() {
                tracing::debug!(student_id, "delete refused for non-admin");
                return Ok((
                    false,
                    vec![Action::Notify(Notification::warning(
                        "Only administrators can delete students",
                    ))],
                ));
            }
            open_modal(
                state,
                Modal::ConfirmDelete {
                    student_id: *student_id,
                },
            )
        }
        Event::ConfirmDelete => match state.modal {
            Some(Modal::ConfirmDelete { student_id }) if state.is_admin() => {
                state.modal = None;
                Ok((
                    true,
                    vec![Action::Dispatch(ApiRequest::delete_student(student_id))],
                ))
            }
            _ => Ok((false, vec![])),
        },

        Event::SubmitGuardian {
            student_id,
            id,
            draft,
        } => match draft.clone().validate() {
            Ok(draft) => Ok((
                false,
                vec![Action::Dispatch(ApiRequest::save_guardian(
                    *student_id,
                    *id,
                    draft,
                ))],
            )),
            Err(e) => Ok((false, vec![notify_error(&e)])),
        },
        Event::DeleteGuardian(id) => Ok((
            false,
            vec![Action::Dispatch(ApiRequest::delete_guardian(*id))],
        )),
        Event::SubmitGrade {
            student_id,
            id,
            draft,
        } => match draft.clone().validate() {
            Ok(draft) => Ok((
                false,
                vec![Action::Dispatch(ApiRequest::save_grade(*student_id, *id, draft))],
            )),
            Err(e) => Ok((false, vec![notify_error(&e)])),
        },
        Event::DeleteGrade(id) => Ok((
            false,
            vec![Action::Dispatch(ApiRequest::delete_grade(*id))],
        )),

        Event::ExportRequested(format) => {
            let students = state.list.derived();
            if students.is_empty() {
                tracing::debug!("export skipped, derived set is empty");
                return Ok((
                    false,
                    vec![Action::Notify(Notification::warning("No students to export"))],
                ));
            }
            let rendered = export::export_students(
                *format,
                students,
                state.list.filters(),
                chrono::Utc::now(),
            );
            Ok((false, export_actions(*format, rendered)))
        }

        Event::ApiResponse(response) => handle_response(state, response),
    }
}

fn handle_response(state: &mut AppState, response: &ApiResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        ApiResponse::StudentsLoaded { seq, students } => {
            if !state.sequencer.accept(*seq) {
                return Ok((false, vec![]));
            }
            state.loading = state.sequencer.is_pending();
            state.list.set_records(students.clone());
            Ok((true, vec![]))
        }
        ApiResponse::StudentsFailed { seq, message } => {
            state.sequencer.fail(*seq);
            state.loading = state.sequencer.is_pending();
            Ok((
                true,
                vec![Action::Notify(Notification::error(format!(
                    "Failed to load students: {message}"
                )))],
            ))
        }
        ApiResponse::ClassesLoaded { classes } => {
            state.classes.clone_from(classes);
            Ok((true, vec![]))
        }
        ApiResponse::StatsLoaded { stats } => {
            state.stats = Some(*stats);
            Ok((true, vec![]))
        }
        ApiResponse::StudentSaved { student, created } => {
            let verb = if *created { "created" } else { "updated" };
            state.modal = None;
            let mut actions = vec![Action::Notify(Notification::success(format!(
                "Student {} {verb}",
                student.name
            )))];
            actions.extend(dispatch_all(state.refresh_requests()));
            Ok((true, actions))
        }
        ApiResponse::StudentDeleted { id } => {
            let name = state
                .list
                .find(*id)
                .map_or_else(|| format!("#{id}"), |s| s.name.clone());
            let mut actions = vec![Action::Notify(Notification::success(format!(
                "Student {name} deleted"
            )))];
            actions.extend(dispatch_all(state.refresh_requests()));
            Ok((true, actions))
        }
        ApiResponse::ClassCreated { class } => {
            state.modal = None;
            Ok((
                true,
                vec![
                    Action::Notify(Notification::success(format!("Class {} created", class.name))),
                    Action::Dispatch(ApiRequest::load_classes()),
                    Action::Dispatch(ApiRequest::load_stats()),
                ],
            ))
        }
        ApiResponse::Enrolled { student } => {
            state.modal = None;
            let class = student.class_name.as_deref().unwrap_or("class");
            let mut actions = vec![Action::Notify(Notification::success(format!(
                "{} enrolled in {class}",
                student.name
            )))];
            actions.extend(dispatch_all(state.refresh_requests()));
            Ok((true, actions))
        }
        ApiResponse::GuardiansLoaded {
            student_id,
            guardians,
        } => {
            if !details_open_for(state, *student_id) {
                return Ok((false, vec![]));
            }
            state.guardians.clone_from(guardians);
            Ok((true, vec![]))
        }
        ApiResponse::GradesLoaded { student_id, grades } => {
            if !details_open_for(state, *student_id) {
                return Ok((false, vec![]));
            }
            state.grades.clone_from(grades);
            Ok((true, vec![]))
        }
        ApiResponse::GuardianSaved { guardian } => Ok((
            false,
            vec![
                Action::Notify(Notification::success(format!("Guardian {} saved", guardian.name))),
                Action::Dispatch(ApiRequest::load_guardians(guardian.student_id)),
            ],
        )),
        ApiResponse::GradeSaved { grade } => Ok((
            false,
            vec![
                Action::Notify(Notification::success(format!("Grade for {} saved", grade.subject))),
                Action::Dispatch(ApiRequest::load_grades(grade.student_id)),
            ],
        )),
        ApiResponse::GuardianDeleted { .. } => {
            let mut actions = vec![Action::Notify(Notification::success("Guardian deleted"))];
            if let Some(Modal::Details { student_id }) = state.modal {
                actions.push(Action::Dispatch(ApiRequest::load_guardians(student_id)));
            }
            Ok((false, actions))
        }
        ApiResponse::GradeDeleted { .. } => {
            let mut actions = vec![Action::Notify(Notification::success("Grade deleted"))];
            if let Some(Modal::Details { student_id }) = state.modal {
                actions.push(Action::Dispatch(ApiRequest::load_grades(student_id)));
            }
            Ok((false, actions))
        }
        ApiResponse::Error { operation, message } => {
            tracing::debug!(%operation, %message, "api request failed");
            Ok((
                true,
                vec![Action::Notify(Notification::error(format!(
                    "Failed to {operation}: {message}"
                )))],
            ))
        }
    }
}

fn open_modal(state: &mut AppState, modal: Modal) -> Result<(bool, Vec<Action>)> {
    if let Some(student_id) = modal.student_id() {
        if state.list.find(student_id).is_none() {
            tracing::debug!(student_id, "modal target not in list");
            return Ok((
                false,
                vec![Action::Notify(Notification::error(format!(
                    "student {student_id} not found"
                )))],
            ));
        }
    }

    state.modal = Some(modal);
    let actions = match modal {
        Modal::Details { student_id } => {
            state.guardians.clear();
            state.grades.clear();
            vec![
                Action::Dispatch(ApiRequest::load_guardians(student_id)),
                Action::Dispatch(ApiRequest::load_grades(student_id)),
            ]
        }
        Modal::Enroll { .. } | Modal::ClassForm => {
            vec![Action::Dispatch(ApiRequest::load_classes())]
        }
        Modal::StudentForm { .. } | Modal::ConfirmDelete { .. } => vec![],
    };
    Ok((true, actions))
}

fn details_open_for(state: &AppState, student_id: i64) -> bool {
    state.modal == Some(Modal::Details { student_id })
}

fn save_sort(state: &AppState) -> Vec<Action> {
    vec![Action::SaveSortPreference(state.list.sort().clone())]
}

fn dispatch_all(requests: Vec<ApiRequest>) -> Vec<Action> {
    requests.into_iter().map(Action::Dispatch).collect()
}

fn export_actions(format: ExportFormat, rendered: Result<ExportFile>) -> Vec<Action> {
    match rendered {
        Ok(file) => {
            let message = format!("{} students exported to {format}", file.record_count);
            vec![
                Action::WriteExport(file),
                Action::Notify(Notification::success(message)),
            ]
        }
        Err(e) => {
            tracing::warn!(error = %e, "export failed");
            vec![notify_error(&e)]
        }
    }
}

fn notify_error(error: &crate::RosterError) -> Action {
    Action::Notify(Notification::error(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, Student};
    use crate::listview::SortDirection;
    use crate::Config;
    use chrono::NaiveDate;

    fn student(id: i64, name: &str, age: u32, status: StudentStatus) -> Student {
        Student {
            id,
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            email: None,
            status,
            class_id: None,
            class_name: None,
            age,
            phone: None,
            notes: None,
        }
    }

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "secretaria".to_string(),
            display_name: None,
            role,
        }
    }

    fn signed_in(role: Role) -> AppState {
        let mut state = AppState::new(&Config::default()).unwrap();
        handle_event(&mut state, &Event::LoggedIn(user(role))).unwrap();
        let students = vec![
            student(1, "Carla", 12, StudentStatus::Active),
            student(2, "Ana", 9, StudentStatus::Inactive),
            student(3, "Bruno", 15, StudentStatus::Active),
        ];
        handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::StudentsLoaded { seq: 1, students }),
        )
        .unwrap();
        state
    }

    fn names(state: &AppState) -> Vec<String> {
        state
            .compute_viewmodel()
            .cards
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn login_dispatches_initial_loads() {
        let mut state = AppState::new(&Config::default()).unwrap();
        let (render, actions) = handle_event(&mut state, &Event::LoggedIn(user(Role::User))).unwrap();
        assert!(render);
        assert_eq!(state.screen, Screen::Students);
        assert_eq!(actions.len(), 3);
        assert!(matches!(
            &actions[0],
            Action::Dispatch(ApiRequest::LoadStudents { seq: 1, .. })
        ));
    }

    #[test]
    fn stale_student_response_is_discarded() {
        let mut state = signed_in(Role::User);
        handle_event(&mut state, &Event::Refresh).unwrap();
        handle_event(&mut state, &Event::Refresh).unwrap();

        let newest = vec![student(9, "Zeca", 10, StudentStatus::Active)];
        handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::StudentsLoaded { seq: 3, students: newest }),
        )
        .unwrap();

        let stale = vec![student(8, "Velho", 10, StudentStatus::Active)];
        let (render, _) = handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::StudentsLoaded { seq: 2, students: stale }),
        )
        .unwrap();

        assert!(!render);
        assert_eq!(names(&state), vec!["Zeca"]);
        assert!(!state.loading);
    }

    #[test]
    fn status_filter_and_sort_toggle() {
        let mut state = signed_in(Role::User);
        handle_event(&mut state, &Event::StatusFilterChanged(Some(StudentStatus::Active))).unwrap();
        assert_eq!(names(&state), vec!["Bruno", "Carla"]);

        handle_event(&mut state, &Event::SortFieldChanged("idade".to_string())).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::SortDirectionToggled).unwrap();
        assert_eq!(names(&state), vec!["Bruno", "Carla"]);
        assert_eq!(
            actions,
            vec![Action::SaveSortPreference(SortSpec::new("idade", SortDirection::Desc))]
        );
    }

    #[test]
    fn enroll_offered_only_to_inactive_and_delete_only_to_admin() {
        let state = signed_in(Role::User);
        let cards = state.compute_viewmodel().cards;
        let ana = cards.iter().find(|c| c.name == "Ana").unwrap();
        assert!(ana.can_enroll);
        assert!(!ana.can_delete);
        assert!(cards.iter().filter(|c| c.name != "Ana").all(|c| !c.can_enroll));

        let admin = signed_in(Role::Admin);
        assert!(admin.compute_viewmodel().cards.iter().all(|c| c.can_delete));
    }

    #[test]
    fn non_admin_cannot_delete() {
        let mut state = signed_in(Role::User);
        let (_, actions) = handle_event(&mut state, &Event::RequestDelete(1)).unwrap();
        assert!(matches!(&actions[0], Action::Notify(n) if n.level == crate::app::NotificationLevel::Warning));
        assert_eq!(state.modal, None);
    }

    #[test]
    fn admin_delete_goes_through_confirmation() {
        let mut state = signed_in(Role::Admin);
        handle_event(&mut state, &Event::RequestDelete(1)).unwrap();
        assert_eq!(state.modal, Some(Modal::ConfirmDelete { student_id: 1 }));

        let (_, actions) = handle_event(&mut state, &Event::ConfirmDelete).unwrap();
        assert_eq!(
            actions,
            vec![Action::Dispatch(ApiRequest::delete_student(1))]
        );
        assert_eq!(state.modal, None);
    }

    #[test]
    fn invalid_draft_never_reaches_the_api() {
        let mut state = signed_in(Role::User);
        let draft = StudentDraft {
            name: "Al".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            email: None,
            status: StudentStatus::Active,
            class_id: None,
            phone: None,
            notes: None,
        };
        let (_, actions) =
            handle_event(&mut state, &Event::SubmitStudent { id: None, draft }).unwrap();
        assert_eq!(actions.len(), 1);
        assert!(matches!(&actions[0], Action::Notify(_)));
    }

    #[test]
    fn empty_export_warns() {
        let mut state = signed_in(Role::User);
        handle_event(&mut state, &Event::SearchChanged("nobody".to_string())).unwrap();
        let (_, actions) =
            handle_event(&mut state, &Event::ExportRequested(ExportFormat::Csv)).unwrap();
        assert_eq!(
            actions,
            vec![Action::Notify(Notification::warning("No students to export"))]
        );
    }

    #[test]
    fn export_covers_every_filtered_page() {
        let config = Config {
            page_size: 1,
            ..Config::default()
        };
        let mut state = AppState::new(&config).unwrap();
        let students = vec![
            student(1, "Carla", 12, StudentStatus::Active),
            student(2, "Ana", 9, StudentStatus::Active),
        ];
        state.list.set_records(students);

        let (_, actions) =
            handle_event(&mut state, &Event::ExportRequested(ExportFormat::Json)).unwrap();
        let Action::WriteExport(file) = &actions[0] else {
            panic!("expected an export, got {actions:?}");
        };
        assert_eq!(file.record_count, 2);
    }

    #[test]
    fn export_failure_is_reported_as_error() {
        let actions = export_actions(
            ExportFormat::Json,
            Err(crate::RosterError::Export("failed to serialize export".to_string())),
        );
        assert_eq!(
            actions,
            vec![Action::Notify(Notification::error(
                "Export error: failed to serialize export"
            ))]
        );
    }

    #[test]
    fn failed_newest_fetch_clears_loading() {
        let mut state = AppState::new(&Config::default()).unwrap();
        handle_event(&mut state, &Event::LoggedIn(user(Role::User))).unwrap();
        handle_event(&mut state, &Event::Refresh).unwrap();

        let (_, actions) = handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::StudentsFailed {
                seq: 2,
                message: "connection refused".to_string(),
            }),
        )
        .unwrap();
        assert!(matches!(&actions[0], Action::Notify(n) if n.level == crate::app::NotificationLevel::Error));
        assert!(!state.loading);

        handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::StudentsLoaded {
                seq: 1,
                students: vec![],
            }),
        )
        .unwrap();
        assert!(!state.loading);
        assert!(state.compute_viewmodel().empty_state.is_some());
    }

    #[test]
    fn responses_issued_before_logout_are_dropped() {
        let mut state = AppState::new(&Config::default()).unwrap();
        handle_event(&mut state, &Event::LoggedIn(user(Role::User))).unwrap();
        handle_event(&mut state, &Event::LoggedOut).unwrap();

        let (render, _) = handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::StudentsLoaded {
                seq: 1,
                students: vec![student(1, "Carla", 12, StudentStatus::Active)],
            }),
        )
        .unwrap();
        assert!(!render);
        assert!(state.list.records().is_empty());
        assert_eq!(state.screen, Screen::Login);
        assert!(!state.loading);
    }

    #[test]
    fn late_guardians_for_closed_modal_are_ignored() {
        let mut state = signed_in(Role::User);
        handle_event(&mut state, &Event::OpenModal(Modal::Details { student_id: 1 })).unwrap();
        handle_event(&mut state, &Event::CloseModal).unwrap();

        let (render, _) = handle_event(
            &mut state,
            &Event::ApiResponse(ApiResponse::GuardiansLoaded {
                student_id: 1,
                guardians: vec![],
            }),
        )
        .unwrap();
        assert!(!render);
    }

    #[test]
    fn logout_clears_list() {
        let mut state = signed_in(Role::User);
        handle_event(&mut state, &Event::LoggedOut).unwrap();
        assert!(state.list.records().is_empty());
        assert_eq!(state.screen, Screen::Login);
    }
}
