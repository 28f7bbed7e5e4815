//! Data-fetch collaborator of the application layer.
//!
//! - `api`: the [`SchoolApi`] trait and server-side [`StudentQuery`]
//! - `memory`: in-process [`MemorySchoolApi`]
//! - `messages`: request/response protocol with trace propagation
//! - `worker`: [`ApiWorker`] executing requests, inline or on a thread
//! - `sequence`: last-fetch-wins [`FetchSequencer`]

pub mod api;
pub mod memory;
pub mod messages;
pub mod sequence;
pub mod worker;

pub use api::{SchoolApi, StudentQuery};
pub use memory::{MemorySchoolApi, Seed};
pub use messages::{ApiRequest, ApiResponse, TraceContext};
pub use sequence::FetchSequencer;
pub use worker::{ApiWorker, WorkerHandle};
