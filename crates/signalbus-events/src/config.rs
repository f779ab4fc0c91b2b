//! Event manager configuration.
//!
//! # Environment Variables
//!
//! - `SIGNALBUS_MANAGER_NAME`: Name used in log output
//! - `SIGNALBUS_DEFAULT_PRIORITY`: Priority used by `on` when none is given

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::manager::EventManager;

/// Environment variable for the manager name.
pub const MANAGER_NAME_ENV: &str = "SIGNALBUS_MANAGER_NAME";

/// Environment variable for the default listener priority.
pub const DEFAULT_PRIORITY_ENV: &str = "SIGNALBUS_DEFAULT_PRIORITY";

const DEFAULT_MANAGER_NAME: &str = "default";

/// Configuration for an [`EventManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Name recorded on every log line the manager emits.
    pub name: String,
    /// Priority given to listeners registered without one.
    pub default_priority: i32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MANAGER_NAME.to_string(),
            default_priority: EventManager::PRIORITY_NORMAL,
        }
    }
}

impl ManagerConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from the process environment.
    ///
    /// Unset variables keep their defaults. A priority that does not parse as
    /// an integer is logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(name) = lookup(MANAGER_NAME_ENV) {
            config.name = name;
        }

        if let Some(raw) = lookup(DEFAULT_PRIORITY_ENV) {
            match raw.trim().parse::<i32>() {
                Ok(priority) => config.default_priority = priority,
                Err(e) => warn!(
                    var = DEFAULT_PRIORITY_ENV,
                    value = %raw,
                    error = %e,
                    "ignoring invalid default priority"
                ),
            }
        }

        config
    }

    /// Sets the manager name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the default priority.
    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();

        assert_eq!(config.name, "default");
        assert_eq!(config.default_priority, 100);
    }

    #[test]
    fn test_config_builder() {
        let config = ManagerConfig::new()
            .with_name("plugins")
            .with_default_priority(EventManager::PRIORITY_LOW);

        assert_eq!(config.name, "plugins");
        assert_eq!(config.default_priority, 200);
    }

    #[test]
    fn test_from_lookup() {
        let config = ManagerConfig::from_lookup(lookup(&[
            (MANAGER_NAME_ENV, "app"),
            (DEFAULT_PRIORITY_ENV, " 50 "),
        ]));

        assert_eq!(config.name, "app");
        assert_eq!(config.default_priority, 50);
    }

    #[test]
    fn test_from_lookup_invalid_priority() {
        let config = ManagerConfig::from_lookup(lookup(&[(DEFAULT_PRIORITY_ENV, "high")]));

        assert_eq!(config.name, "default");
        assert_eq!(config.default_priority, EventManager::PRIORITY_NORMAL);
    }

    #[test]
    fn test_from_lookup_empty() {
        let config = ManagerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ManagerConfig::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ManagerConfig = serde_json::from_str(r#"{"name": "ui"}"#).unwrap();

        assert_eq!(config.name, "ui");
        assert_eq!(config.default_priority, EventManager::PRIORITY_NORMAL);
    }
}
