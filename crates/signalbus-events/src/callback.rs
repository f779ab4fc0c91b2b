//! Callable listener targets with stable identity.
//!
//! A [`Callback`] is what the manager stores and invokes. It is either a
//! shared closure or a method bound to a listener object. Cloning a callback
//! keeps its identity, so the clone can later be handed to
//! [`EventManager::off`](crate::EventManager::off) to remove the original
//! registration. Two callbacks built from separate `Callback::new` calls are
//! never equal, even when they wrap the same code.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use signalbus_models::{Event, Result};

use crate::listener::EventListener;

type HandlerFn = dyn Fn(&mut Event<'_>, &[Value]) -> Result<Option<Value>> + Send + Sync;

/// A listener callback registered on an [`EventManager`](crate::EventManager).
///
/// Callbacks receive the event and the values of its payload in insertion
/// order. The return value drives dispatch:
///
/// - `Ok(Some(Value::Bool(false)))` vetoes the event: default prevented and
///   propagation stopped immediately.
/// - `Ok(Some(value))` for any other non-null value becomes the event result.
/// - `Ok(None)` or `Ok(Some(Value::Null))` leaves the event untouched.
/// - `Err(_)` aborts the dispatch and is returned to the caller.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use signalbus_events::{Callback, EventManager};
///
/// let manager = EventManager::new();
/// let double = Callback::new(|_event, args| {
///     let n = args.first().and_then(|v| v.as_i64()).unwrap_or(0);
///     Ok(Some(json!(n * 2)))
/// });
///
/// manager.on("double", double.clone());
/// let event = manager.trigger("double", vec![json!(21)]).unwrap();
/// assert_eq!(event.result(), Some(&json!(42)));
///
/// assert!(manager.off("double", Some(&double)));
/// assert!(!manager.has("double"));
/// ```
#[derive(Clone)]
pub struct Callback {
    target: Target,
}

#[derive(Clone)]
enum Target {
    Closure(Arc<HandlerFn>),
    Method {
        receiver: Arc<dyn EventListener>,
        method: String,
    },
}

impl Callback {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Event<'_>, &[Value]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            target: Target::Closure(Arc::new(f)),
        }
    }

    /// Binds `method` on `receiver`.
    ///
    /// Binding the same receiver and method twice yields equal callbacks.
    pub fn bound(receiver: Arc<dyn EventListener>, method: impl Into<String>) -> Self {
        Self {
            target: Target::Method {
                receiver,
                method: method.into(),
            },
        }
    }

    /// Invokes the callback.
    pub fn call(&self, event: &mut Event<'_>, args: &[Value]) -> Result<Option<Value>> {
        match &self.target {
            Target::Closure(f) => f(event, args),
            Target::Method { receiver, method } => receiver.call(method, event, args),
        }
    }

    /// Returns the bound method name, if this callback is a bound method.
    pub fn method(&self) -> Option<&str> {
        match &self.target {
            Target::Closure(_) => None,
            Target::Method { method, .. } => Some(method),
        }
    }
}

// Compare data pointers only; vtable pointers for the same type may differ
// between codegen units.
fn same_allocation<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        match (&self.target, &other.target) {
            (Target::Closure(a), Target::Closure(b)) => same_allocation(a, b),
            (
                Target::Method {
                    receiver: ra,
                    method: ma,
                },
                Target::Method {
                    receiver: rb,
                    method: mb,
                },
            ) => same_allocation(ra, rb) && ma == mb,
            _ => false,
        }
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Closure(c) => f
                .debug_tuple("Closure")
                .field(&(Arc::as_ptr(c) as *const ()))
                .finish(),
            Target::Method { receiver, method } => f
                .debug_struct("Method")
                .field("receiver", &(Arc::as_ptr(receiver) as *const ()))
                .field("method", method)
                .finish(),
        }
    }
}
