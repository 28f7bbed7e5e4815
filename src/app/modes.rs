//! Screen and modal state types.
//!
//! The client shows one of two screens. On the student screen at most one
//! modal form is open at a time; the modal records which student it edits so
//! late responses for another student can be ignored.

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// No signed-in user.
    #[default]
    Login,
    /// Student list with filters, sort and pagination.
    Students,
}

/// Modal form open on top of the student list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Create (`student_id` is `None`) or edit a student.
    StudentForm { student_id: Option<i64> },
    /// Create a class.
    ClassForm,
    /// Pick a class for an inactive student.
    Enroll { student_id: i64 },
    /// Student details with guardians and grades.
    Details { student_id: i64 },
    /// Confirm deletion of a student.
    ConfirmDelete { student_id: i64 },
}

impl Modal {
    /// The student this modal is about, if any.
    #[must_use]
    pub const fn student_id(&self) -> Option<i64> {
        match self {
            Self::StudentForm { student_id } => *student_id,
            Self::ClassForm => None,
            Self::Enroll { student_id }
            | Self::Details { student_id }
            | Self::ConfirmDelete { student_id } => Some(*student_id),
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::StudentForm { student_id: None } => "New student",
            Self::StudentForm { student_id: Some(_) } => "Edit student",
            Self::ClassForm => "New class",
            Self::Enroll { .. } => "Enroll student",
            Self::Details { .. } => "Student details",
            Self::ConfirmDelete { .. } => "Delete student",
        }
    }
}
