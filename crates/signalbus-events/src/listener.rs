//! Listener objects that register several callbacks at once.

use std::sync::Arc;

use serde_json::Value;
use signalbus_models::{Event, EventError, Result};

use crate::callback::Callback;

/// What a listener entry invokes.
#[derive(Debug, Clone)]
pub enum Handler {
    /// A method on the listener itself, looked up through
    /// [`EventListener::call`].
    Method(String),
    /// A ready-made callback. Return the same `Callback` (a clone) every
    /// time, otherwise `remove_listener` cannot find it again.
    Callback(Callback),
}

/// One entry of [`EventListener::implemented_events`].
#[derive(Debug, Clone)]
pub struct ListenerSpec {
    /// The callable to register.
    pub handler: Handler,
    /// Registration priority; the manager default when `None`.
    pub priority: Option<i32>,
}

impl ListenerSpec {
    /// Creates a spec for a method on the listener.
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            handler: Handler::Method(name.into()),
            priority: None,
        }
    }

    /// Creates a spec for a callback.
    pub fn callback(callback: Callback) -> Self {
        Self {
            handler: Handler::Callback(callback),
            priority: None,
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns the method name when the handler is a method.
    pub fn method_name(&self) -> Option<&str> {
        match &self.handler {
            Handler::Method(method) => Some(method),
            Handler::Callback(_) => None,
        }
    }

    /// Resolves the handler against `listener` into a registrable callback.
    pub(crate) fn resolve(self, listener: &Arc<dyn EventListener>) -> (Callback, Option<i32>) {
        let callback = match self.handler {
            Handler::Method(method) => Callback::bound(Arc::clone(listener), method),
            Handler::Callback(callback) => callback,
        };
        (callback, self.priority)
    }
}

impl From<&str> for ListenerSpec {
    fn from(method: &str) -> Self {
        Self::method(method)
    }
}

impl From<String> for ListenerSpec {
    fn from(method: String) -> Self {
        Self::method(method)
    }
}

impl From<Callback> for ListenerSpec {
    fn from(callback: Callback) -> Self {
        Self::callback(callback)
    }
}

/// An object that knows which events it wants to handle.
///
/// Implementors list their events in [`implemented_events`] and route method
/// names to code in [`call`]. Every method name used by a [`Handler::Method`]
/// spec must also be accepted by [`handles`]; `add_listener` checks this and
/// rejects the listener with [`EventError::UnknownMethod`] before registering
/// anything, so a misspelled method fails at registration rather than in the
/// middle of a dispatch.
///
/// Registering with
/// [`EventManager::add_listener`](crate::EventManager::add_listener) binds each
/// method to this particular instance, so two instances of the same type get
/// separate registrations and can be removed independently.
///
/// The manager keeps an `Arc` to every registered listener until it is
/// removed; a listener that also holds an `Arc` to the manager forms a cycle.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use serde_json::{json, Value};
/// use signalbus_events::{Event, EventListener, EventManager, ListenerSpec, Result};
///
/// #[derive(Default)]
/// struct Audit {
///     seen: Mutex<Vec<Value>>,
/// }
///
/// impl EventListener for Audit {
///     fn implemented_events(&self) -> Vec<(String, ListenerSpec)> {
///         vec![("saved".to_string(), "record".into())]
///     }
///
///     fn handles(&self, method: &str) -> bool {
///         method == "record"
///     }
///
///     fn call(
///         &self,
///         _method: &str,
///         _event: &mut Event<'_>,
///         args: &[Value],
///     ) -> Result<Option<Value>> {
///         self.seen.lock().unwrap().extend(args.iter().cloned());
///         Ok(None)
///     }
/// }
///
/// let manager = EventManager::new();
/// let audit = Arc::new(Audit::default());
/// manager.add_listener(audit.clone()).unwrap();
/// manager.trigger("saved", vec![json!(5)]).unwrap();
/// assert_eq!(*audit.seen.lock().unwrap(), vec![json!(5)]);
/// ```
///
/// [`implemented_events`]: EventListener::implemented_events
/// [`handles`]: EventListener::handles
/// [`call`]: EventListener::call
pub trait EventListener: Send + Sync + 'static {
    /// Returns `(event name, spec)` pairs, registered in order.
    fn implemented_events(&self) -> Vec<(String, ListenerSpec)>;

    /// Returns true if [`call`](Self::call) handles `method`.
    ///
    /// The default handles nothing, matching the default `call`.
    fn handles(&self, _method: &str) -> bool {
        false
    }

    /// Invokes the method called `method`.
    ///
    /// Only reached for names [`handles`](Self::handles) accepted. The default
    /// reports the method as missing.
    fn call(&self, method: &str, _event: &mut Event<'_>, _args: &[Value]) -> Result<Option<Value>> {
        Err(EventError::listener(format!("no handler for method `{method}`")))
    }
}

/// Checks that every method spec of `listener` names a handled method.
pub(crate) fn validate(
    listener: &dyn EventListener,
    specs: &[(String, ListenerSpec)],
) -> Result<()> {
    for (event, spec) in specs {
        if let Some(method) = spec.method_name() {
            if !listener.handles(method) {
                return Err(EventError::UnknownMethod {
                    event: event.clone(),
                    method: method.to_string(),
                });
            }
        }
    }
    Ok(())
}
