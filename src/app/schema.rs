//! List configuration for the student list.

use crate::domain::{FieldValue, Student};
use crate::listview::{FilterDef, FilterKind, ListSchema};

/// Preference key under which the student list's sort order is saved.
pub const STUDENT_LIST: &str = "students";

/// Filter key of the search box.
pub const SEARCH: &str = "search";
/// Filter key of the class select.
pub const CLASS: &str = "turma_id";
/// Filter key of the status select.
pub const STATUS: &str = "status";

/// Builds the student list schema.
///
/// The search box matches `nome` by substring, or fuzzily when `fuzzy` is set.
/// `turma` sorts by class name, with students without a class first.
#[must_use]
pub fn student_schema(fuzzy: bool) -> ListSchema<Student> {
    let search_kind = if fuzzy {
        FilterKind::Fuzzy
    } else {
        FilterKind::Contains
    };

    ListSchema::new("nome")
        .with_filter(SEARCH, FilterDef::new("nome", search_kind))
        .with_filter(CLASS, FilterDef::new("turma_id", FilterKind::Equals))
        .with_filter(STATUS, FilterDef::new("status", FilterKind::Equals))
        .with_sort_field("idade")
        .with_sort_field("status")
        .with_sort_field("id")
        .with_sort_field("data_nascimento")
        .with_sort_field("email")
        .with_derived("turma", |s: &Student| {
            FieldValue::from(s.class_name.clone().unwrap_or_default())
        })
}
