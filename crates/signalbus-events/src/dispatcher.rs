//! Dispatch capability for components that raise their own events.

use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock};

use signalbus_models::{Event, EventData, Result};

use crate::manager::EventManager;

/// Holds the manager of an [`EventDispatcher`], created on first use.
#[derive(Debug, Default)]
pub struct ManagerCell {
    manager: RwLock<Option<Arc<EventManager>>>,
}

impl ManagerCell {
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell that already holds `manager`.
    pub fn with_manager(manager: Arc<EventManager>) -> Self {
        Self {
            manager: RwLock::new(Some(manager)),
        }
    }

    /// Returns the manager, creating a default one if the cell is empty.
    pub fn get(&self) -> Arc<EventManager> {
        let current = self.manager.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manager) = current.as_ref() {
            return manager.clone();
        }
        drop(current);

        self.manager
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert_with(|| Arc::new(EventManager::new()))
            .clone()
    }

    /// Replaces the manager.
    pub fn set(&self, manager: Arc<EventManager>) {
        *self.manager.write().unwrap_or_else(PoisonError::into_inner) = Some(manager);
    }
}

/// A component that raises events through an [`EventManager`].
///
/// Implementors only expose where their manager lives; raising events,
/// swapping managers and lazy creation come for free.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use signalbus_events::{Callback, EventData, EventDispatcher, ManagerCell};
///
/// #[derive(Default)]
/// struct Document {
///     events: ManagerCell,
/// }
///
/// impl EventDispatcher for Document {
///     fn manager_cell(&self) -> &ManagerCell {
///         &self.events
///     }
/// }
///
/// let doc = Document::default();
/// doc.event_manager().on("beforeSave", Callback::new(|event, _| {
///     assert!(event.subject_as::<Document>().is_some());
///     Ok(Some(json!("checked")))
/// }));
///
/// let event = doc.dispatch_event("beforeSave", EventData::new(), true, None).unwrap();
/// assert_eq!(event.result(), Some(&json!("checked")));
/// ```
pub trait EventDispatcher: Any {
    /// Returns the cell holding this component's manager.
    fn manager_cell(&self) -> &ManagerCell;

    /// Returns the manager, creating a default one on first access.
    fn event_manager(&self) -> Arc<EventManager> {
        self.manager_cell().get()
    }

    /// Replaces the manager.
    fn set_event_manager(&self, manager: Arc<EventManager>) -> &Self
    where
        Self: Sized,
    {
        self.manager_cell().set(manager);
        self
    }

    /// Builds and dispatches an event raised by this component.
    ///
    /// The subject defaults to `self`.
    fn dispatch_event<'s>(
        &'s self,
        name: impl Into<String>,
        data: impl Into<EventData>,
        cancelable: bool,
        subject: Option<&'s dyn Any>,
    ) -> Result<Event<'s>>
    where
        Self: Sized,
    {
        let subject: &'s dyn Any = match subject {
            Some(subject) => subject,
            None => self,
        };

        let mut event = Event::new(name)
            .with_subject(subject)
            .with_data(data)
            .with_cancelable(cancelable);
        self.event_manager().dispatch(&mut event)?;
        Ok(event)
    }
}
