//! Request and response protocol between the application layer and the API worker.
//!
//! Requests cross a thread boundary, so each one carries the caller's trace
//! context; spans opened by the worker are then parented to the span that
//! issued the request.

use super::api::StudentQuery;
use crate::domain::{
    ClassDraft, Grade, GradeDraft, Guardian, GuardianDraft, SchoolClass, Stats, Student,
    StudentDraft,
};
use serde::{Deserialize, Serialize};

/// Trace and parent span identifiers captured from the current span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// Trace ID as 32 hex digits.
    pub trace_id: String,

    /// Span ID of the issuing span as 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry context of [`tracing::Span::current`].
    ///
    /// Returns `None` outside of a valid, exported span (for example when
    /// tracing has not been initialized).
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        let trace_id = format!("{:032x}", span_context.trace_id());
        let parent_span_id = format!("{:016x}", span_context.span_id());
        tracing::debug!(%trace_id, %parent_span_id, "trace context captured");

        Some(Self {
            trace_id,
            parent_span_id,
        })
    }
}

/// Generates `ApiRequest` constructors that attach the current trace context.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Creates a `", stringify!($variant), "` request with the current trace context.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    load_students(LoadStudents { seq: u64, query: StudentQuery }),
    load_classes(LoadClasses {}),
    load_stats(LoadStats {}),
    create_student(CreateStudent { draft: StudentDraft }),
    update_student(UpdateStudent { id: i64, draft: StudentDraft }),
    delete_student(DeleteStudent { id: i64 }),
    create_class(CreateClass { draft: ClassDraft }),
    enroll(Enroll { student_id: i64, class_id: i64 }),
    load_guardians(LoadGuardians { student_id: i64 }),
    save_guardian(SaveGuardian { student_id: i64, id: Option<i64>, draft: GuardianDraft }),
    delete_guardian(DeleteGuardian { id: i64 }),
    load_grades(LoadGrades { student_id: i64 }),
    save_grade(SaveGrade { student_id: i64, id: Option<i64>, draft: GradeDraft }),
    delete_grade(DeleteGrade { id: i64 }),
}

/// Requests handled by the [`ApiWorker`](super::ApiWorker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// Fetch the student list. `seq` orders concurrent fetches.
    LoadStudents {
        seq: u64,
        query: StudentQuery,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    LoadClasses {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    LoadStats {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    CreateStudent {
        draft: StudentDraft,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    UpdateStudent {
        id: i64,
        draft: StudentDraft,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    DeleteStudent {
        id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    CreateClass {
        draft: ClassDraft,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    /// Enroll a student in a class (`POST /matriculas`).
    Enroll {
        student_id: i64,
        class_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    LoadGuardians {
        student_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    /// Create (`id` is `None`) or update a guardian.
    SaveGuardian {
        student_id: i64,
        id: Option<i64>,
        draft: GuardianDraft,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    DeleteGuardian {
        id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    LoadGrades {
        student_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    /// Create (`id` is `None`) or update a grade.
    SaveGrade {
        student_id: i64,
        id: Option<i64>,
        draft: GradeDraft,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
    DeleteGrade {
        id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl ApiRequest {
    /// The trace context attached when the request was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadStudents { trace_context, .. }
            | Self::LoadClasses { trace_context }
            | Self::LoadStats { trace_context }
            | Self::CreateStudent { trace_context, .. }
            | Self::UpdateStudent { trace_context, .. }
            | Self::DeleteStudent { trace_context, .. }
            | Self::CreateClass { trace_context, .. }
            | Self::Enroll { trace_context, .. }
            | Self::LoadGuardians { trace_context, .. }
            | Self::SaveGuardian { trace_context, .. }
            | Self::DeleteGuardian { trace_context, .. }
            | Self::LoadGrades { trace_context, .. }
            | Self::SaveGrade { trace_context, .. }
            | Self::DeleteGrade { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short operation name used in logs and error messages.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::LoadStudents { .. } => "load students",
            Self::LoadClasses { .. } => "load classes",
            Self::LoadStats { .. } => "load stats",
            Self::CreateStudent { .. } => "create student",
            Self::UpdateStudent { .. } => "update student",
            Self::DeleteStudent { .. } => "delete student",
            Self::CreateClass { .. } => "create class",
            Self::Enroll { .. } => "enroll student",
            Self::LoadGuardians { .. } => "load guardians",
            Self::SaveGuardian { .. } => "save guardian",
            Self::DeleteGuardian { .. } => "delete guardian",
            Self::LoadGrades { .. } => "load grades",
            Self::SaveGrade { .. } => "save grade",
            Self::DeleteGrade { .. } => "delete grade",
        }
    }
}

/// Responses sent back by the worker, one per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiResponse {
    StudentsLoaded {
        seq: u64,
        students: Vec<Student>,
    },
    /// The student list fetch numbered `seq` failed.
    StudentsFailed {
        seq: u64,
        message: String,
    },
    ClassesLoaded {
        classes: Vec<SchoolClass>,
    },
    StatsLoaded {
        stats: Stats,
    },
    /// A student was created (`created`) or updated.
    StudentSaved {
        student: Student,
        created: bool,
    },
    StudentDeleted {
        id: i64,
    },
    ClassCreated {
        class: SchoolClass,
    },
    Enrolled {
        student: Student,
    },
    GuardiansLoaded {
        student_id: i64,
        guardians: Vec<Guardian>,
    },
    GuardianSaved {
        guardian: Guardian,
    },
    GuardianDeleted {
        id: i64,
    },
    GradesLoaded {
        student_id: i64,
        grades: Vec<Grade>,
    },
    GradeSaved {
        grade: Grade,
    },
    GradeDeleted {
        id: i64,
    },
    /// The request failed. `operation` names what was attempted.
    Error {
        operation: String,
        message: String,
    },
}
