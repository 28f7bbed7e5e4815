//! School API abstraction.
//!
//! [`SchoolApi`] is the data-fetch collaborator of the application layer. The
//! trait is kept to the operations the screens actually perform, one method per
//! endpoint of the school API.

use crate::domain::{
    ClassDraft, Grade, GradeDraft, Guardian, GuardianDraft, Result, SchoolClass, Stats, Student,
    StudentDraft, StudentStatus,
};
use serde::{Deserialize, Serialize};

/// Server-side filters of the student list endpoint (`GET /alunos`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentQuery {
    /// Case-insensitive substring of the student name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "turma_id", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StudentStatus>,
}

impl StudentQuery {
    /// Query with no constraints; the list view filters client-side.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether `student` satisfies every constraint of the query.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |needle| {
            needle.is_empty() || student.name.to_lowercase().contains(&needle.to_lowercase())
        });
        let class_ok = self.class_id.map_or(true, |id| student.class_id == Some(id));
        let status_ok = self.status.map_or(true, |status| student.status == status);
        search_ok && class_ok && status_ok
    }
}

/// Access to the school-management API.
///
/// # Implementations
///
/// - [`MemorySchoolApi`](super::MemorySchoolApi): in-process store seeded from JSON
pub trait SchoolApi: Send {
    /// Lists students matching `query`, with `idade` and `turma_nome` filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    fn list_students(&self, query: &StudentQuery) -> Result<Vec<Student>>;

    /// # Errors
    ///
    /// Returns a validation error for an invalid draft, `NotFound` for an
    /// unknown class, or an API error when the class is full.
    fn create_student(&mut self, draft: StudentDraft) -> Result<Student>;

    /// # Errors
    ///
    /// Same as [`SchoolApi::create_student`], plus `NotFound` for an unknown id.
    fn update_student(&mut self, id: i64, draft: StudentDraft) -> Result<Student>;

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    fn delete_student(&mut self, id: i64) -> Result<()>;

    /// Lists classes with their current enrollment counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    fn list_classes(&self) -> Result<Vec<SchoolClass>>;

    /// # Errors
    ///
    /// Returns a validation error for an invalid draft.
    fn create_class(&mut self, draft: ClassDraft) -> Result<SchoolClass>;

    /// Puts a student in a class and marks them active.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown student or class, or an API error
    /// when the class is full.
    fn enroll(&mut self, student_id: i64, class_id: i64) -> Result<Student>;

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown student.
    fn list_guardians(&self, student_id: i64) -> Result<Vec<Guardian>>;

    /// # Errors
    ///
    /// Returns a validation error for an invalid draft or `NotFound` for an
    /// unknown student.
    fn create_guardian(&mut self, student_id: i64, draft: GuardianDraft) -> Result<Guardian>;

    /// # Errors
    ///
    /// Returns a validation error for an invalid draft or `NotFound` for an
    /// unknown guardian.
    fn update_guardian(&mut self, id: i64, draft: GuardianDraft) -> Result<Guardian>;

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown guardian.
    fn delete_guardian(&mut self, id: i64) -> Result<()>;

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown student.
    fn list_grades(&self, student_id: i64) -> Result<Vec<Grade>>;

    /// # Errors
    ///
    /// Returns a validation error for an invalid draft or `NotFound` for an
    /// unknown student.
    fn create_grade(&mut self, student_id: i64, draft: GradeDraft) -> Result<Grade>;

    /// # Errors
    ///
    /// Returns a validation error for an invalid draft or `NotFound` for an
    /// unknown grade.
    fn update_grade(&mut self, id: i64, draft: GradeDraft) -> Result<Grade>;

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown grade.
    fn delete_grade(&mut self, id: i64) -> Result<()>;

    /// Dashboard counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    fn stats(&self) -> Result<Stats>;
}
