//! Lifecycle defaults
//!
//! Values used when a caller does not pass them explicitly. Every field has a
//! default so an empty `[lifecycle]` table is valid.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where a loaded element is inserted relative to its parent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    /// Insert as the last child
    #[default]
    Append,
    /// Accepted but not acted on: the element is tagged and left detached
    Other(String),
}

impl Position {
    pub fn as_str(&self) -> &str {
        match self {
            Position::Append => "append",
            Position::Other(value) => value,
        }
    }
}

impl From<&str> for Position {
    fn from(value: &str) -> Self {
        match value {
            "append" => Position::Append,
            other => Position::Other(other.to_string()),
        }
    }
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        Position::from(value.as_str())
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.as_str().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defaults and switches for [`ComponentManager`](crate::ComponentManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Parent selector for loads that do not name one
    pub parent: String,
    /// Insert position for loads that do not name one
    pub position: Position,
    /// Whether `unload_default` removes every instance
    pub unload_all: bool,
    /// Give up waiting for the mount root after this many milliseconds
    pub mount_timeout_ms: Option<u64>,
    /// Invoke `mounted`/`unmounted` hooks
    pub run_hooks: bool,
}

impl LifecycleConfig {
    pub fn mount_timeout(&self) -> Option<Duration> {
        self.mount_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            parent: "body".to_string(),
            position: Position::Append,
            unload_all: false,
            mount_timeout_ms: None,
            run_hooks: false,
        }
    }
}
