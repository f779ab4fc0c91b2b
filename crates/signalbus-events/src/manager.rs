//! EventManager - priority-ordered listener registry and synchronous dispatch.
//!
//! # Dispatch Order
//!
//! Listeners for a name run by ascending priority; equal priorities run in
//! registration order. When a manager has a parent, every listener of the
//! child runs (or the event is stopped) before the event moves up to the
//! parent, and so on up the chain.
//!
//! # Re-entrancy
//!
//! The registry sits behind a `RwLock`, but no lock is held while a listener
//! runs: dispatch copies the binding list for the event name first. Listeners
//! may therefore register, remove or trigger events on the same manager.
//! Changes to the name being dispatched apply from the next dispatch on.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use signalbus_models::{Event, EventData, Result};
use tracing::{debug, trace, warn};

use crate::callback::Callback;
use crate::config::ManagerConfig;
use crate::listener::EventListener;

/// A callback registered for one event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerBinding {
    /// The callback to invoke.
    pub callback: Callback,
    /// Lower runs earlier.
    pub priority: i32,
}

/// Registry of named listeners with priority-ordered, synchronous dispatch.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use signalbus_events::{Callback, EventManager};
///
/// let manager = EventManager::new();
///
/// let veto = Callback::new(|_, _| Ok(Some(Value::Bool(false))));
/// manager.on_with_priority("save", veto, EventManager::PRIORITY_HIGH);
/// manager.on("save", Callback::new(|_, _| Ok(Some(json!("saved")))));
///
/// let event = manager.trigger("save", vec![]).unwrap();
/// assert!(event.is_default_prevented());
/// assert!(event.result().is_none());
/// ```
pub struct EventManager {
    config: ManagerConfig,
    /// Bindings by event name, each list sorted by priority.
    events: RwLock<HashMap<String, Vec<ListenerBinding>>>,
    parent: Option<Arc<EventManager>>,
}

impl EventManager {
    /// Runs before normal listeners.
    pub const PRIORITY_HIGH: i32 = 10;
    /// Priority used when none is given, unless configured otherwise.
    pub const PRIORITY_NORMAL: i32 = 100;
    /// Runs after normal listeners.
    pub const PRIORITY_LOW: i32 = 200;

    /// Creates a manager with the default config and no parent.
    pub fn new() -> Self {
        Self {
            config: ManagerConfig::default(),
            events: RwLock::new(HashMap::new()),
            parent: None,
        }
    }

    /// Replaces the config.
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the manager events fall through to after this one.
    pub fn with_parent(mut self, parent: Arc<EventManager>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn parent(&self) -> Option<&Arc<EventManager>> {
        self.parent.as_ref()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<ListenerBinding>>> {
        // Listeners never run under the lock, so a poisoned registry is intact.
        self.events.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<ListenerBinding>>> {
        self.events.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `callback` for `name` at the configured default priority.
    pub fn on(&self, name: impl Into<String>, callback: Callback) -> &Self {
        self.on_with_priority(name, callback, self.config.default_priority)
    }

    /// Registers `callback` for `name` at `priority`.
    ///
    /// The new binding runs after any existing binding with the same priority.
    pub fn on_with_priority(
        &self,
        name: impl Into<String>,
        callback: Callback,
        priority: i32,
    ) -> &Self {
        let name = name.into();
        let mut events = self.write();
        let bindings = events.entry(name.clone()).or_default();

        bindings.push(ListenerBinding { callback, priority });
        // Stable sort keeps registration order among equal priorities.
        bindings.sort_by_key(|b| b.priority);

        debug!(
            manager = %self.config.name,
            event = %name,
            priority,
            listeners = bindings.len(),
            "listener registered"
        );
        self
    }

    /// Removes listeners for `name`.
    ///
    /// With `None`, every listener for `name` is removed. With a callback,
    /// every binding identical to it is removed, however many times it was
    /// registered. Returns true if anything was removed; unknown names and
    /// callbacks are a no-op.
    pub fn off(&self, name: &str, callback: Option<&Callback>) -> bool {
        let mut events = self.write();
        let Some(bindings) = events.get_mut(name) else {
            return false;
        };

        let removed = match callback {
            None => bindings.len(),
            Some(callback) => {
                let before = bindings.len();
                bindings.retain(|b| b.callback != *callback);
                before - bindings.len()
            }
        };

        if callback.is_none() || bindings.is_empty() {
            events.remove(name);
        }

        if removed > 0 {
            debug!(manager = %self.config.name, event = %name, removed, "listeners removed");
        }
        removed > 0
    }

    /// Returns true if `name` has at least one listener.
    pub fn has(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Returns the number of listeners registered for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.read().get(name).map(Vec::len).unwrap_or(0)
    }

    /// Returns the bindings for `name` in dispatch order.
    pub fn listeners(&self, name: &str) -> Vec<ListenerBinding> {
        self.read().get(name).cloned().unwrap_or_default()
    }

    /// Returns every event name with listeners, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Removes all listeners. The parent is kept.
    pub fn clear(&self) {
        self.write().clear();
        debug!(manager = %self.config.name, "listeners cleared");
    }

    /// Registers every entry of `listener.implemented_events()`.
    ///
    /// Method handlers are bound to this `listener` instance.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownMethod`](signalbus_models::EventError::UnknownMethod)
    /// when a method handler names a method the listener does not
    /// [`handle`](EventListener::handles). Nothing is registered in that case.
    pub fn add_listener(&self, listener: Arc<dyn EventListener>) -> Result<&Self> {
        let specs = listener.implemented_events();
        if let Err(e) = crate::listener::validate(listener.as_ref(), &specs) {
            warn!(manager = %self.config.name, error = %e, "listener rejected");
            return Err(e);
        }

        for (name, spec) in specs {
            let (callback, priority) = spec.resolve(&listener);
            let priority = priority.unwrap_or(self.config.default_priority);
            self.on_with_priority(name, callback, priority);
        }
        Ok(self)
    }

    /// Removes what [`add_listener`](Self::add_listener) registered for
    /// `listener`.
    pub fn remove_listener(&self, listener: Arc<dyn EventListener>) -> &Self {
        for (name, spec) in listener.implemented_events() {
            let (callback, _) = spec.resolve(&listener);
            self.off(&name, Some(&callback));
        }
        self
    }

    /// Delivers `event` to this manager's listeners, then to the parent chain.
    ///
    /// Returns the same event. A listener that returns `false` prevents the
    /// default and stops the event immediately.
    ///
    /// # Errors
    ///
    /// Returns the first error a listener returns, and
    /// [`EventError::NotCancelable`](signalbus_models::EventError::NotCancelable)
    /// when a listener returns `false` for an event that is not cancelable.
    /// Remaining listeners do not run in either case.
    pub fn dispatch<'e, 'a>(&self, event: &'e mut Event<'a>) -> Result<&'e mut Event<'a>> {
        let listeners = self.listeners(event.name());

        if !listeners.is_empty() {
            debug!(
                manager = %self.config.name,
                event = %event.name(),
                listeners = listeners.len(),
                "dispatching event"
            );
        }

        for binding in &listeners {
            if event.is_stopped() {
                trace!(manager = %self.config.name, event = %event.name(), "event stopped");
                break;
            }

            let args: Vec<Value> = event.data().values().cloned().collect();
            trace!(
                manager = %self.config.name,
                event = %event.name(),
                priority = binding.priority,
                "invoking listener"
            );

            match binding.callback.call(event, &args)? {
                Some(Value::Bool(false)) => {
                    if let Err(e) = event.prevent_default() {
                        warn!(
                            manager = %self.config.name,
                            event = %event.name(),
                            "listener vetoed a non-cancelable event"
                        );
                        return Err(e);
                    }
                    event.stop_immediate_propagation();
                }
                None | Some(Value::Null) => {}
                Some(value) => {
                    event.set_result(value);
                }
            }
        }

        match &self.parent {
            Some(parent) if !event.is_propagation_stopped() => parent.dispatch(event),
            _ => Ok(event),
        }
    }

    /// Builds an event named `name` carrying `args` and dispatches it.
    pub fn trigger(
        &self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Result<Event<'static>> {
        let mut event = Event::new(name).with_data(EventData::positional(args));
        self.dispatch(&mut event)?;
        Ok(event)
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("config", &self.config)
            .field("events", &self.event_names())
            .field("parent", &self.parent.as_ref().map(|p| &p.config.name))
            .finish()
    }
}
