//! Core data models for Signalbus.
//!
//! This crate provides the value types that flow through a dispatch: the
//! [`Event`] itself, its ordered [`EventData`] payload, and the
//! [`EventError`] raised when a listener vetoes a non-cancelable event.

pub mod data;
pub mod error;
pub mod event;

// Re-export main types
pub use data::EventData;
pub use error::{EventError, Result};
pub use event::Event;
