//! View layer: view models and a plain-text renderer.
//!
//! ```text
//! AppState → compute_viewmodel → ListViewModel → render → String
//! ```

pub mod renderer;
pub mod style;
pub mod viewmodel;

pub use renderer::{render, render_notification};
pub use style::Style;
pub use viewmodel::{EmptyState, HeaderInfo, ListViewModel, PaginationBar, StudentCard};
