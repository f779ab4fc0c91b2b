//! Error types for event operations.

use thiserror::Error;

/// Errors that can occur while raising or handling an event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// `prevent_default` was called on an event built with `cancelable = false`.
    #[error("event '{name}' is not cancelable")]
    NotCancelable {
        /// Name of the event that refused cancellation.
        name: String,
    },

    /// A listener object lists a method its method table does not handle.
    #[error("listener has no method `{method}` for event '{event}'")]
    UnknownMethod {
        /// Event the method was listed for.
        event: String,
        /// The unhandled method name.
        method: String,
    },

    /// A listener failed while handling an event.
    #[error("listener failed: {0}")]
    Listener(String),
}

impl EventError {
    /// Creates a listener failure from any displayable message.
    pub fn listener(message: impl Into<String>) -> Self {
        EventError::Listener(message.into())
    }

    /// Returns true if this is a cancellation-not-permitted error.
    pub fn is_not_cancelable(&self) -> bool {
        matches!(self, EventError::NotCancelable { .. })
    }
}

/// Result type alias for event operations.
pub type Result<T> = std::result::Result<T, EventError>;
