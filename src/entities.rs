//! Entity registry mapping connection names to model definitions
//!
//! Application modules declare which models belong to which named
//! connection during startup; the connection bootstrapper reads the
//! accumulated lists once at connection-creation time. The registry is an
//! explicit object owned by the composition root, so tests can run
//! against isolated instances.

use crate::config::ConnectionOptions;
use crate::orm::Model;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Reference to a connection, either by name or by its configuration
#[derive(Clone, Copy)]
pub enum ConnectionToken<'a> {
    Name(&'a str),
    Options(&'a ConnectionOptions),
}

impl<'a> ConnectionToken<'a> {
    /// Resolve the token to a usable connection name
    ///
    /// Returns `None` for an absent or empty name.
    pub fn resolve(&self) -> Option<&'a str> {
        let name = match self {
            Self::Name(name) => Some(*name),
            Self::Options(options) => options.name.as_deref(),
        };
        name.filter(|name| !name.is_empty())
    }
}

impl<'a> From<&'a str> for ConnectionToken<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for ConnectionToken<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a ConnectionOptions> for ConnectionToken<'a> {
    fn from(options: &'a ConnectionOptions) -> Self {
        Self::Options(options)
    }
}

/// Registry of model definitions per connection name
///
/// Entries accumulate monotonically during startup and are never
/// removed. Insertion order is preserved and duplicate registrations of
/// the same model (by identity) are suppressed.
pub struct EntityRegistry {
    entities: RwLock<HashMap<String, Vec<Arc<dyn Model>>>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Register models under a connection
    ///
    /// A token that resolves to no usable name makes the call a silent
    /// no-op; registering the same model twice is equally silent. Neither
    /// is an error the caller observes.
    pub async fn register<'a>(
        &self,
        connection: impl Into<ConnectionToken<'a>>,
        models: &[Arc<dyn Model>],
    ) {
        let name = match connection.into().resolve() {
            Some(name) => name.to_string(),
            None => {
                log::debug!("Skipping model registration without a connection name");
                return;
            }
        };

        let mut entities = self.entities.write().await;
        let collection = entities.entry(name.clone()).or_default();

        for model in models {
            if collection.iter().any(|known| Arc::ptr_eq(known, model)) {
                continue;
            }
            collection.push(model.clone());
        }

        log::debug!(
            "Connection '{}' now has {} registered models",
            name,
            collection.len()
        );
    }

    /// Get the models registered under a connection, in registration order
    ///
    /// Returns an empty list for an unresolvable or unknown name; never
    /// fails.
    pub async fn lookup<'a>(
        &self,
        connection: impl Into<ConnectionToken<'a>>,
    ) -> Vec<Arc<dyn Model>> {
        let name = match connection.into().resolve() {
            Some(name) => name,
            None => return Vec::new(),
        };

        let entities = self.entities.read().await;
        entities.get(name).cloned().unwrap_or_default()
    }

    /// Look up a single registered model by name under a connection
    pub async fn model<'a>(
        &self,
        connection: impl Into<ConnectionToken<'a>>,
        model_name: &str,
    ) -> Option<Arc<dyn Model>> {
        self.lookup(connection)
            .await
            .into_iter()
            .find(|model| model.name() == model_name)
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
