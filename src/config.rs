//! Connection configuration structures and parsing
//!
//! A connection is described by a handful of control fields consumed by
//! this crate plus an open-ended set of backing-store parameters that are
//! passed through to the ORM verbatim. The struct layout keeps the two
//! apart, so the ORM-facing configuration handed to the connection
//! factory never contains the control fields.

use crate::error::Result;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Name used when a connection is configured without an explicit one
pub const DEFAULT_CONNECTION_NAME: &str = "default";

/// ORM-facing connection parameters, passed through uninterpreted
pub type OrmOptions = serde_json::Map<String, Value>;

/// Options forwarded only to the schema synchronization step
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncOptions {
    /// Drop and recreate tables instead of altering them
    #[serde(default)]
    pub force: bool,

    /// Alter existing tables to match the model definitions
    #[serde(default)]
    pub alter: bool,
}

/// Configuration for a single connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// Connection name; the well-known default is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Total number of bootstrap attempts
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between bootstrap attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Attach registered models, authenticate and synchronize on bootstrap
    #[serde(default)]
    pub auto_load_models: bool,

    /// Run schema synchronization after authenticating; treated as true
    /// when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synchronize: Option<bool>,

    /// Options forwarded to the synchronization step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncOptions>,

    /// Backing-store parameters handed to the connection factory verbatim
    #[serde(flatten)]
    pub orm: OrmOptions,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            name: None,
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            auto_load_models: false,
            synchronize: None,
            sync: None,
            orm: OrmOptions::new(),
        }
    }
}

impl ConnectionOptions {
    /// Deserialize options from a JSON value
    ///
    /// Unknown fields land in the passthrough `orm` map rather than being
    /// rejected, so the host application's configuration file can carry
    /// arbitrary backing-store parameters next to the control fields.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve the name this connection is known by
    ///
    /// An unset or empty name resolves to [`DEFAULT_CONNECTION_NAME`].
    pub fn connection_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_CONNECTION_NAME,
        }
    }

    /// Whether schema synchronization should run (unset means yes)
    pub fn synchronize_enabled(&self) -> bool {
        self.synchronize.unwrap_or(true)
    }

    /// Retry policy derived from the attempt and delay fields
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            self.retry_attempts,
            Duration::from_millis(self.retry_delay_ms),
        )
    }
}

fn default_retry_attempts() -> u32 {
    10
}

fn default_retry_delay_ms() -> u64 {
    3000
}

/// Builder for [`ConnectionOptions`]
pub struct ConnectionOptionsBuilder {
    options: ConnectionOptions,
}

impl ConnectionOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: ConnectionOptions::default(),
        }
    }

    /// Set the connection name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// Set the total number of bootstrap attempts
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.options.retry_attempts = attempts;
        self
    }

    /// Set the delay between bootstrap attempts in milliseconds
    pub fn retry_delay_ms(mut self, delay_ms: u64) -> Self {
        self.options.retry_delay_ms = delay_ms;
        self
    }

    /// Attach registered models, authenticate and synchronize on bootstrap
    pub fn auto_load_models(mut self, enabled: bool) -> Self {
        self.options.auto_load_models = enabled;
        self
    }

    /// Enable or disable schema synchronization
    pub fn synchronize(mut self, enabled: bool) -> Self {
        self.options.synchronize = Some(enabled);
        self
    }

    /// Set the options forwarded to the synchronization step
    pub fn sync(mut self, sync: SyncOptions) -> Self {
        self.options.sync = Some(sync);
        self
    }

    /// Add a backing-store parameter passed through to the ORM
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.orm.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> ConnectionOptions {
        self.options
    }
}

impl Default for ConnectionOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = ConnectionOptions::default();

        assert_eq!(options.retry_attempts, 10);
        assert_eq!(options.retry_delay_ms, 3000);
        assert!(!options.auto_load_models);
        assert!(options.synchronize_enabled());
        assert_eq!(options.connection_name(), DEFAULT_CONNECTION_NAME);
    }

    #[test]
    fn test_connection_name_resolution() {
        let named = ConnectionOptionsBuilder::new().name("analytics").build();
        assert_eq!(named.connection_name(), "analytics");

        let empty = ConnectionOptionsBuilder::new().name("").build();
        assert_eq!(empty.connection_name(), DEFAULT_CONNECTION_NAME);
    }

    #[test]
    fn test_synchronize_unset_is_enabled() {
        let options = ConnectionOptions::default();
        assert!(options.synchronize_enabled());

        let disabled = ConnectionOptionsBuilder::new().synchronize(false).build();
        assert!(!disabled.synchronize_enabled());
    }

    #[test]
    fn test_from_value_splits_control_and_orm_fields() {
        let options = ConnectionOptions::from_value(json!({
            "name": "analytics",
            "retry_attempts": 3,
            "retry_delay_ms": 50,
            "auto_load_models": true,
            "synchronize": false,
            "dialect": "postgres",
            "host": "localhost",
            "port": 5432
        }))
        .unwrap();

        assert_eq!(options.connection_name(), "analytics");
        assert_eq!(options.retry_attempts, 3);
        assert_eq!(options.retry_delay_ms, 50);
        assert!(options.auto_load_models);
        assert!(!options.synchronize_enabled());

        // Control fields stay out of the passthrough map
        assert!(options.orm.get("name").is_none());
        assert!(options.orm.get("retry_attempts").is_none());
        assert_eq!(options.orm.get("dialect"), Some(&json!("postgres")));
        assert_eq!(options.orm.get("port"), Some(&json!(5432)));
    }

    #[test]
    fn test_retry_policy_from_options() {
        let options = ConnectionOptionsBuilder::new()
            .retry_attempts(3)
            .retry_delay_ms(10)
            .build();

        let policy = options.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(10));
    }

    #[test]
    fn test_sync_options_deserialization() {
        let options = ConnectionOptions::from_value(json!({
            "sync": { "alter": true }
        }))
        .unwrap();

        let sync = options.sync.unwrap();
        assert!(sync.alter);
        assert!(!sync.force);
    }
}
