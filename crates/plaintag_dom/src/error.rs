//! Document error types

use thiserror::Error;

/// Errors raised by document operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A helper received a value of the wrong shape
    #[error("Invalid {what} type. Expected {expected} got {found}")]
    InvalidArgumentType {
        what: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Tag names must be non-empty ASCII alphanumerics (plus `-`)
    #[error("Invalid element name, got {0:?}")]
    InvalidTagName(String),

    /// Selector text could not be parsed
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The element id does not refer to a live element
    #[error("Element does not exist in this document")]
    UnknownElement,

    /// Inserting the element would make it its own ancestor
    #[error("Cannot insert an element into its own subtree")]
    HierarchyRequest,
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DomError>;
