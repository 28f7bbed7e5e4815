//! Domain layer for the roster client.
//!
//! Core domain types, independent of the list view engine, the API transport
//! and the view layer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`record`]: The generic [`Record`] abstraction the list view engine works on
//! - [`student`]: Student model (the record type of the main list)
//! - [`school`]: Classes, guardians, grades, users and statistics

pub mod error;
pub mod record;
pub mod school;
pub mod student;

pub use error::{Result, RosterError};
pub use record::{FieldValue, Record};
pub use school::{
    ClassDraft, Grade, GradeDraft, GradeStage, Guardian, GuardianDraft, Role, SchoolClass, Stats,
    User,
};
pub use student::{age_on, Student, StudentDraft, StudentStatus};
