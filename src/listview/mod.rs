//! Generic filter / sort / paginate engine.
//!
//! The engine knows nothing about students: a [`ListSchema`] tells it which
//! filter keys exist, which fields are sortable and how to read derived
//! fields, and any [`Record`](crate::domain::Record) can be listed.

mod filter;
mod page;
mod schema;
mod sort;
mod state;

pub use filter::{FilterDef, FilterKind, FilterSpec};
pub use page::{PageState, PaginationInfo};
pub use schema::{Accessor, ListSchema};
pub use sort::{SortDirection, SortSpec};
pub use state::ListViewState;
