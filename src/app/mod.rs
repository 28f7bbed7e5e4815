//! Application layer coordinating state, events, and actions.
//!
//! Unidirectional flow:
//!
//! ```text
//! User intent → Event → handle_event → AppState mutation → Actions → Side effects
//!                           ↑                                   ↓
//!                           └───────── ApiResponse ◄── worker ◄─┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effect commands emitted by the handler
//! - [`handler`]: event processing and state transitions
//! - [`modes`]: screen and modal state types
//! - [`schema`]: filter keys and sortable fields of the student list
//! - [`state`]: application state and view model computation
//!
//! # Example
//!
//! ```
//! use roster::app::{handle_event, AppState, Event};
//! use roster::Config;
//!
//! let mut state = AppState::new(&Config::default())?;
//! let (render, actions) = handle_event(&mut state, &Event::SearchChanged("ana".into()))?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), roster::RosterError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod schema;
pub mod state;

pub use actions::{Action, Notification, NotificationLevel};
pub use handler::{handle_event, Event};
pub use modes::{Modal, Screen};
pub use schema::student_schema;
pub use state::AppState;
