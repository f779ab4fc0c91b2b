//! The event value object passed through a dispatch.
//!
//! An [`Event`] has a fixed identity (name, subject, cancelability) and
//! mutable state that listeners use to talk back to the caller: the payload,
//! a result slot and three flags. The flags are monotonic; once set they stay
//! set for the life of the event.

use std::any::Any;

use serde_json::Value;

use crate::data::EventData;
use crate::error::{EventError, Result};

/// One occurrence of a named event.
///
/// The subject is borrowed from whoever raised the event, so an event never
/// outlives the call that built it. Dispatch passes it by `&mut` through
/// every listener and up the manager chain, which also rules out dispatching
/// the same event from two threads at once.
#[derive(Debug)]
pub struct Event<'a> {
    name: String,
    subject: Option<&'a dyn Any>,
    data: EventData,
    cancelable: bool,
    result: Option<Value>,
    default_prevented: bool,
    propagation_stopped: bool,
    stopped: bool,
}

impl<'a> Event<'a> {
    /// Creates a cancelable event with no subject and an empty payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: None,
            data: EventData::new(),
            cancelable: true,
            result: None,
            default_prevented: false,
            propagation_stopped: false,
            stopped: false,
        }
    }

    /// Sets the object on whose behalf the event is raised.
    pub fn with_subject(mut self, subject: &'a dyn Any) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Sets the initial payload.
    pub fn with_data(mut self, data: impl Into<EventData>) -> Self {
        self.data = data.into();
        self
    }

    /// Sets whether listeners may prevent the default action.
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> Option<&'a dyn Any> {
        self.subject
    }

    /// Returns the subject downcast to `T`, if it is one.
    pub fn subject_as<T: Any>(&self) -> Option<&'a T> {
        self.subject.and_then(|s| s.downcast_ref::<T>())
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Replaces the whole payload.
    pub fn set_data(&mut self, data: impl Into<EventData>) -> &mut Self {
        self.data = data.into();
        self
    }

    /// Replaces the result.
    pub fn set_result(&mut self, result: impl Into<Value>) -> &mut Self {
        self.result = Some(result.into());
        self
    }

    /// Returns true if a listener asked to skip the default action.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Returns true if the event will not be handed to a parent manager.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Returns true if no further listener will see the event.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Marks the default action as prevented.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NotCancelable`] if the event was built with
    /// `cancelable = false`; the flag is left untouched.
    pub fn prevent_default(&mut self) -> Result<&mut Self> {
        if !self.cancelable {
            return Err(EventError::NotCancelable {
                name: self.name.clone(),
            });
        }

        self.default_prevented = true;
        Ok(self)
    }

    /// Stops the event from reaching the parent manager.
    ///
    /// Remaining listeners on the current manager still run.
    pub fn stop_propagation(&mut self) -> &mut Self {
        self.propagation_stopped = true;
        self
    }

    /// Stops the event right away, on this manager and every parent.
    pub fn stop_immediate_propagation(&mut self) -> &mut Self {
        self.stopped = true;
        self.stop_propagation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_creation() {
        let event = Event::new("test");

        assert_eq!(event.name(), "test");
        assert!(event.subject().is_none());
        assert!(event.data().is_empty());
        assert!(event.result().is_none());
        assert!(event.is_cancelable());
        assert!(!event.is_default_prevented());
        assert!(!event.is_propagation_stopped());
        assert!(!event.is_stopped());
    }

    #[test]
    fn test_event_with_data() {
        let event = Event::new("test").with_data(EventData::new().with("a", 1));
        assert_eq!(event.data().get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_set_data_replaces() {
        let mut event = Event::new("test").with_data(EventData::new().with("a", 1));
        event.set_data(vec![json!("b")]);

        assert!(event.data().get("a").is_none());
        assert_eq!(event.data().get_index(0), Some(&json!("b")));
    }

    #[test]
    fn test_set_result_last_writer_wins() {
        let mut event = Event::new("test");
        event.set_result(1).set_result("two");
        assert_eq!(event.result(), Some(&json!("two")));
    }

    #[test]
    fn test_subject_downcast() {
        struct Owner {
            id: u32,
        }

        let owner = Owner { id: 7 };
        let event = Event::new("test").with_subject(&owner);

        let subject = event.subject_as::<Owner>().unwrap();
        assert_eq!(subject.id, 7);
        assert!(std::ptr::eq(subject, &owner));
        assert!(event.subject_as::<String>().is_none());
    }

    #[test]
    fn test_prevent_default() {
        let mut event = Event::new("test");
        event.prevent_default().unwrap();

        assert!(event.is_default_prevented());
        assert!(!event.is_propagation_stopped());
    }

    #[test]
    fn test_prevent_default_not_cancelable() {
        let mut event = Event::new("test").with_cancelable(false);

        let result = event.prevent_default();
        assert!(matches!(
            result,
            Err(EventError::NotCancelable { ref name }) if name == "test"
        ));
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_stop_propagation() {
        let mut event = Event::new("test");
        event.stop_propagation();

        assert!(event.is_propagation_stopped());
        assert!(!event.is_stopped());
    }

    #[test]
    fn test_stop_immediate_propagation_implies_stop_propagation() {
        let mut event = Event::new("test");
        event.stop_immediate_propagation();

        assert!(event.is_stopped());
        assert!(event.is_propagation_stopped());
        assert!(!event.is_default_prevented());
    }
}
