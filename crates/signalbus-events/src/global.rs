//! Process-wide event bus.
//!
//! A single shared [`EventManager`] for code that has no manager of its own
//! to hand around. Call [`init`] once at startup to configure it; otherwise
//! the first use creates it from [`ManagerConfig::from_env`]. Prefer owning a
//! manager where possible: instance managers can be parented and tested in
//! isolation, the global one cannot be reset beyond [`clear`].

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use signalbus_models::{Event, Result};
use tracing::debug;

use crate::callback::Callback;
use crate::config::ManagerConfig;
use crate::manager::EventManager;

static BUS: OnceLock<Arc<EventManager>> = OnceLock::new();

/// Creates the global manager with `config`.
///
/// Returns false if it already exists, in which case `config` is ignored.
pub fn init(config: ManagerConfig) -> bool {
    let created = BUS.set(Arc::new(EventManager::new().with_config(config))).is_ok();
    if created {
        debug!("global event bus initialized");
    }
    created
}

/// Returns the global manager, creating it if needed.
pub fn manager() -> Arc<EventManager> {
    BUS.get_or_init(|| Arc::new(EventManager::new().with_config(ManagerConfig::from_env())))
        .clone()
}

/// Registers `callback` for `name` at the default priority.
pub fn on(name: impl Into<String>, callback: Callback) {
    manager().on(name, callback);
}

/// Registers `callback` for `name` at `priority`.
pub fn on_with_priority(name: impl Into<String>, callback: Callback, priority: i32) {
    manager().on_with_priority(name, callback, priority);
}

/// Removes listeners for `name`; see [`EventManager::off`].
pub fn off(name: &str, callback: Option<&Callback>) -> bool {
    manager().off(name, callback)
}

/// Returns true if `name` has at least one listener.
pub fn has(name: &str) -> bool {
    manager().has(name)
}

/// Dispatches `event` on the global manager.
pub fn dispatch<'e, 'a>(event: &'e mut Event<'a>) -> Result<&'e mut Event<'a>> {
    manager().dispatch(event)
}

/// Triggers `name` with positional `args` on the global manager.
pub fn trigger(
    name: impl Into<String>,
    args: impl IntoIterator<Item = Value>,
) -> Result<Event<'static>> {
    manager().trigger(name, args)
}

/// Removes every global listener.
pub fn clear() {
    manager().clear();
}
