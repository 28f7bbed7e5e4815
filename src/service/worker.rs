//! API worker: executes [`ApiRequest`]s against a [`SchoolApi`].
//!
//! The worker can be driven inline with [`ApiWorker::handle_request`] or moved
//! onto its own thread with [`ApiWorker::spawn`], in which case requests and
//! responses travel over channels.

use super::api::SchoolApi;
use super::messages::{ApiRequest, ApiResponse};
use crate::domain::{Result, RosterError};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

pub struct ApiWorker {
    api: Box<dyn SchoolApi>,
}

impl std::fmt::Debug for ApiWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiWorker").finish_non_exhaustive()
    }
}

impl ApiWorker {
    #[must_use]
    pub fn new(api: Box<dyn SchoolApi>) -> Self {
        Self { api }
    }

    /// Maps an API result to a response, logging the outcome.
    fn respond<T, F>(operation: &str, result: Result<T>, on_success: F) -> ApiResponse
    where
        F: FnOnce(T) -> ApiResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "api operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "api operation failed");
                ApiResponse::Error {
                    operation: operation.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Re-attaches the trace context carried by `request` to this thread.
    ///
    /// The returned guard must be held while the request is handled.
    fn attach_parent_trace_context(request: &ApiRequest) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_context = request.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Executes one request. Failures become [`ApiResponse::Error`].
    pub fn handle_request(&mut self, request: ApiRequest) -> ApiResponse {
        let _context_guard = Self::attach_parent_trace_context(&request);
        let operation = request.operation();
        let _span = tracing::debug_span!("api_request", operation).entered();

        let api = self.api.as_mut();
        match request {
            ApiRequest::LoadStudents { seq, query, .. } => match api.list_students(&query) {
                Ok(students) => {
                    tracing::debug!(seq, count = students.len(), "students fetched");
                    ApiResponse::StudentsLoaded { seq, students }
                }
                Err(e) => {
                    tracing::warn!(seq, error = %e, "student fetch failed");
                    ApiResponse::StudentsFailed {
                        seq,
                        message: e.to_string(),
                    }
                }
            },
            ApiRequest::LoadClasses { .. } => {
                Self::respond(operation, api.list_classes(), |classes| {
                    ApiResponse::ClassesLoaded { classes }
                })
            }
            ApiRequest::LoadStats { .. } => {
                Self::respond(operation, api.stats(), |stats| ApiResponse::StatsLoaded { stats })
            }
            ApiRequest::CreateStudent { draft, .. } => {
                Self::respond(operation, api.create_student(draft), |student| {
                    ApiResponse::StudentSaved { student, created: true }
                })
            }
            ApiRequest::UpdateStudent { id, draft, .. } => {
                Self::respond(operation, api.update_student(id, draft), |student| {
                    ApiResponse::StudentSaved { student, created: false }
                })
            }
            ApiRequest::DeleteStudent { id, .. } => {
                Self::respond(operation, api.delete_student(id), |()| {
                    ApiResponse::StudentDeleted { id }
                })
            }
            ApiRequest::CreateClass { draft, .. } => {
                Self::respond(operation, api.create_class(draft), |class| {
                    ApiResponse::ClassCreated { class }
                })
            }
            ApiRequest::Enroll {
                student_id,
                class_id,
                ..
            } => Self::respond(operation, api.enroll(student_id, class_id), |student| {
                ApiResponse::Enrolled { student }
            }),
            ApiRequest::LoadGuardians { student_id, .. } => {
                Self::respond(operation, api.list_guardians(student_id), |guardians| {
                    ApiResponse::GuardiansLoaded {
                        student_id,
                        guardians,
                    }
                })
            }
            ApiRequest::SaveGuardian {
                student_id,
                id,
                draft,
                ..
            } => {
                let result = match id {
                    Some(id) => api.update_guardian(id, draft),
                    None => api.create_guardian(student_id, draft),
                };
                Self::respond(operation, result, |guardian| ApiResponse::GuardianSaved {
                    guardian,
                })
            }
            ApiRequest::DeleteGuardian { id, .. } => {
                Self::respond(operation, api.delete_guardian(id), |()| {
                    ApiResponse::GuardianDeleted { id }
                })
            }
            ApiRequest::LoadGrades { student_id, .. } => {
                Self::respond(operation, api.list_grades(student_id), |grades| {
                    ApiResponse::GradesLoaded { student_id, grades }
                })
            }
            ApiRequest::SaveGrade {
                student_id,
                id,
                draft,
                ..
            } => {
                let result = match id {
                    Some(id) => api.update_grade(id, draft),
                    None => api.create_grade(student_id, draft),
                };
                Self::respond(operation, result, |grade| ApiResponse::GradeSaved { grade })
            }
            ApiRequest::DeleteGrade { id, .. } => {
                Self::respond(operation, api.delete_grade(id), |()| {
                    ApiResponse::GradeDeleted { id }
                })
            }
        }
    }

    /// Moves the worker onto a background thread.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the thread cannot be spawned.
    pub fn spawn(mut self) -> Result<WorkerHandle> {
        let (request_tx, request_rx) = mpsc::channel::<ApiRequest>();
        let (response_tx, response_rx) = mpsc::channel::<ApiResponse>();

        let thread = std::thread::Builder::new()
            .name("roster-api".to_string())
            .spawn(move || {
                for request in request_rx {
                    let response = self.handle_request(request);
                    if response_tx.send(response).is_err() {
                        tracing::debug!("response receiver dropped, stopping worker");
                        break;
                    }
                }
            })?;

        Ok(WorkerHandle {
            requests: request_tx,
            responses: response_rx,
            thread,
        })
    }
}

/// Channel endpoints of a spawned [`ApiWorker`].
#[derive(Debug)]
pub struct WorkerHandle {
    requests: Sender<ApiRequest>,
    responses: Receiver<ApiResponse>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /// Queues a request.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Api`] if the worker thread has stopped.
    pub fn send(&self, request: ApiRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| RosterError::Api("api worker has stopped".to_string()))
    }

    /// Blocks until the next response arrives.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Api`] if the worker thread has stopped.
    pub fn recv(&self) -> Result<ApiResponse> {
        self.responses
            .recv()
            .map_err(|_| RosterError::Api("api worker has stopped".to_string()))
    }

    /// Returns a response if one is ready.
    #[must_use]
    pub fn try_recv(&self) -> Option<ApiResponse> {
        self.responses.try_recv().ok()
    }

    /// Closes the request channel and waits for the thread to finish.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Api`] if the worker thread panicked.
    pub fn shutdown(self) -> Result<()> {
        drop(self.requests);
        self.thread
            .join()
            .map_err(|_| RosterError::Api("api worker panicked".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MemorySchoolApi, StudentQuery};

    #[test]
    fn errors_become_error_responses() {
        let mut worker = ApiWorker::new(Box::new(MemorySchoolApi::default()));
        let response = worker.handle_request(ApiRequest::delete_student(42));
        assert_eq!(
            response,
            ApiResponse::Error {
                operation: "delete student".to_string(),
                message: "student 42 not found".to_string(),
            }
        );
    }

    #[test]
    fn spawned_worker_echoes_sequence_numbers() {
        let handle = ApiWorker::new(Box::new(MemorySchoolApi::default()))
            .spawn()
            .unwrap();
        handle.send(ApiRequest::load_students(1, StudentQuery::all())).unwrap();
        handle.send(ApiRequest::load_students(2, StudentQuery::all())).unwrap();

        let seqs: Vec<u64> = (0..2)
            .map(|_| match handle.recv().unwrap() {
                ApiResponse::StudentsLoaded { seq, .. } => seq,
                other => panic!("unexpected response: {other:?}"),
            })
            .collect();
        assert_eq!(seqs, vec![1, 2]);
        handle.shutdown().unwrap();
    }
}
