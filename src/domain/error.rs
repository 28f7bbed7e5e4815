//! Error types for the roster client.
//!
//! This module defines the centralized error type [`RosterError`] and a type alias
//! [`Result`] used throughout the crate. The list view engine itself only ever
//! produces [`RosterError::Config`]; every other variant belongs to the
//! collaborators around it (API, storage, export).

use thiserror::Error;

/// The main error type for roster operations.
///
/// Most variants carry a human-readable description. I/O errors convert
/// automatically through `#[from]`.
///
/// # Examples
///
/// ```
/// use roster::RosterError;
///
/// fn check_page_size(size: usize) -> Result<(), RosterError> {
///     if size == 0 {
///         return Err(RosterError::Config("page size must be positive".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(check_page_size(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum RosterError {
    /// Configuration is invalid or missing.
    ///
    /// Raised when a configuration value makes the client unusable, most
    /// notably a page size of zero.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preference storage failed to read, parse or write its document.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The school API rejected a request or could not be reached.
    #[error("API error: {0}")]
    Api(String),

    /// A form draft failed validation.
    ///
    /// The message is meant to be shown to the user as-is.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind (`student`, `class`, ...).
        entity: &'static str,
        /// Identifier that was looked up.
        id: i64,
    },

    /// Exporting the derived record set failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// A specialized `Result` type for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
