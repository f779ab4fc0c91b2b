//! Priority-ordered, synchronous event dispatch for Signalbus.
//!
//! This crate provides the `EventManager` for in-process pub/sub with:
//! - Listeners ordered by integer priority, stable among equal priorities
//! - Veto and stop semantics carried on the `Event` itself
//! - Optional parent managers that receive events after their children
//! - Listener objects registering several callbacks at once
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use signalbus_events::{Callback, EventManager};
//!
//! let app = Arc::new(EventManager::new());
//! let plugin = EventManager::new().with_parent(app.clone());
//!
//! app.on("render", Callback::new(|_, _| Ok(Some(json!("app")))));
//! plugin.on("render", Callback::new(|event, _| {
//!     event.stop_propagation();
//!     Ok(Some(json!("plugin")))
//! }));
//!
//! let event = plugin.trigger("render", vec![]).unwrap();
//! assert_eq!(event.result(), Some(&json!("plugin")));
//! ```

pub mod callback;
pub mod config;
pub mod dispatcher;
pub mod global;
pub mod listener;
pub mod manager;

pub use callback::Callback;
pub use config::{ManagerConfig, DEFAULT_PRIORITY_ENV, MANAGER_NAME_ENV};
pub use dispatcher::{EventDispatcher, ManagerCell};
pub use listener::{EventListener, Handler, ListenerSpec};
pub use manager::{EventManager, ListenerBinding};
pub use signalbus_models::{Event, EventData, EventError, Result};
