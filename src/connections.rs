//! Connection registry and shutdown handling
//!
//! The registry is the explicit lookup point replacing a DI container's
//! provider graph: the composition root publishes each bootstrapped
//! handle under its connection's lookup key, dependents fetch handles by
//! name, and shutdown closes everything exactly once.

use crate::bootstrap::ConnectionBootstrapper;
use crate::config::{ConnectionOptions, DEFAULT_CONNECTION_NAME};
use crate::entities::ConnectionToken;
use crate::error::{Error, Result};
use crate::orm::ConnectionHandle;
use crate::tokens::connection_token;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Registry of live connection handles, keyed by connection name
///
/// At most one handle exists per distinct connection name within a
/// registry instance.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<String, ConnectionHandle>>,
}

impl ConnectionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Publish a handle under its connection's lookup key
    ///
    /// Publishing the same name twice is an error: the single-handle-per-
    /// name invariant is enforced here rather than assumed.
    pub async fn publish(&self, name: Option<&str>, handle: ConnectionHandle) -> Result<()> {
        let key = connection_token(name);
        let mut connections = self.connections.write().await;

        if connections.contains_key(&key) {
            let display = name
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_CONNECTION_NAME);
            return Err(Error::DuplicateConnection(display.to_string()));
        }

        log::info!("Publishing connection under key '{}'", key);
        connections.insert(key, handle);
        Ok(())
    }

    /// Look up a handle by connection name or configuration
    pub async fn get<'a>(
        &self,
        connection: impl Into<ConnectionToken<'a>>,
    ) -> Option<ConnectionHandle> {
        let key = connection_token(connection.into().resolve());
        let connections = self.connections.read().await;
        connections.get(&key).cloned()
    }

    /// Look up a handle, failing when it was never published
    pub async fn handle<'a>(
        &self,
        connection: impl Into<ConnectionToken<'a>>,
    ) -> Result<ConnectionHandle> {
        let token = connection.into();
        let display = token.resolve().unwrap_or(DEFAULT_CONNECTION_NAME).to_string();
        self.get(token)
            .await
            .ok_or(Error::ConnectionNotFound(display))
    }

    /// Whether a handle is published for this connection
    pub async fn contains<'a>(&self, connection: impl Into<ConnectionToken<'a>>) -> bool {
        self.get(connection).await.is_some()
    }

    /// Lookup keys of all published connections
    pub async fn keys(&self) -> Vec<String> {
        let connections = self.connections.read().await;
        connections.keys().cloned().collect()
    }

    /// Bootstrap a connection and publish it in one step
    ///
    /// This is the per-connection startup wiring a composition root
    /// performs: run the bootstrapper, then advertise the handle under
    /// the connection's lookup key.
    pub async fn bootstrap_and_publish(
        &self,
        bootstrapper: &ConnectionBootstrapper,
        options: &ConnectionOptions,
    ) -> Result<ConnectionHandle> {
        let handle = bootstrapper.bootstrap(options).await?;
        self.publish(options.name.as_deref(), handle.clone()).await?;
        Ok(handle)
    }

    /// Close every published handle exactly once
    ///
    /// Handles are drained before closing, so a second shutdown call is a
    /// no-op. A close failure is logged and does not abort the remaining
    /// closes; there is no forced-close timeout.
    pub async fn shutdown(&self) {
        let drained: Vec<(String, ConnectionHandle)> = {
            let mut connections = self.connections.write().await;
            connections.drain().collect()
        };

        for (key, handle) in drained {
            log::info!("Closing connection '{}'", key);
            if let Err(error) = handle.close().await {
                log::error!("Failed to close connection '{}': {}", key, error);
            }
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionOptionsBuilder, SyncOptions};
    use crate::orm::{Model, OrmConnection};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct IdleConnection {
        close_calls: AtomicU32,
        fail_close: bool,
    }

    impl IdleConnection {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                close_calls: AtomicU32::new(0),
                fail_close: false,
            })
        }

        fn failing_close() -> Arc<Self> {
            Arc::new(Self {
                close_calls: AtomicU32::new(0),
                fail_close: true,
            })
        }
    }

    #[async_trait]
    impl OrmConnection for IdleConnection {
        fn add_models(&self, _models: Vec<Arc<dyn Model>>) {}

        async fn authenticate(&self) -> Result<()> {
            Ok(())
        }

        async fn sync(&self, _options: Option<&SyncOptions>) -> Result<()> {
            Ok(())
        }

        async fn close(&self) -> Result<()> {
            self.close_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                Err(Error::database_connection("close failed"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_publish_and_get() {
        let registry = ConnectionRegistry::new();
        let connection = IdleConnection::new();

        registry.publish(None, connection.clone()).await.unwrap();

        assert!(registry.get(DEFAULT_CONNECTION_NAME).await.is_some());
        assert!(registry.contains(DEFAULT_CONNECTION_NAME).await);
        assert!(registry.get("analytics").await.is_none());
    }

    #[tokio::test]
    async fn test_get_by_options_token() {
        let registry = ConnectionRegistry::new();
        registry
            .publish(Some("analytics"), IdleConnection::new())
            .await
            .unwrap();

        let options = ConnectionOptionsBuilder::new().name("analytics").build();
        assert!(registry.get(&options).await.is_some());
        assert_eq!(registry.keys().await, vec!["analyticsConnection".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_publish_is_an_error() {
        let registry = ConnectionRegistry::new();
        registry.publish(None, IdleConnection::new()).await.unwrap();

        let result = registry.publish(None, IdleConnection::new()).await;
        assert!(matches!(result, Err(Error::DuplicateConnection(_))));
    }

    #[tokio::test]
    async fn test_handle_errors_when_missing() {
        let registry = ConnectionRegistry::new();
        let result = registry.handle("analytics").await;
        assert!(matches!(result, Err(Error::ConnectionNotFound(name)) if name == "analytics"));
    }

    #[tokio::test]
    async fn test_shutdown_closes_each_handle_once() {
        let registry = ConnectionRegistry::new();
        let first = IdleConnection::new();
        let second = IdleConnection::new();

        registry.publish(None, first.clone()).await.unwrap();
        registry.publish(Some("analytics"), second.clone()).await.unwrap();

        registry.shutdown().await;
        registry.shutdown().await;

        assert_eq!(first.close_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.close_calls.load(Ordering::SeqCst), 1);
        assert!(registry.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_survives_close_failures() {
        let registry = ConnectionRegistry::new();
        let failing = IdleConnection::failing_close();
        let healthy = IdleConnection::new();

        registry.publish(Some("flaky"), failing.clone()).await.unwrap();
        registry.publish(Some("stable"), healthy.clone()).await.unwrap();

        registry.shutdown().await;

        assert_eq!(failing.close_calls.load(Ordering::SeqCst), 1);
        assert_eq!(healthy.close_calls.load(Ordering::SeqCst), 1);
    }
}
