//! Connection bootstrapper
//!
//! Produces exactly one live connection handle from a configuration
//! value, with bounded fixed-delay retry around the whole connect
//! sequence. Two entry points share the sequence: direct mode takes the
//! options eagerly, deferred mode resolves them asynchronously from an
//! [`OptionsProvider`] first.

use crate::config::ConnectionOptions;
use crate::entities::EntityRegistry;
use crate::error::Result;
use crate::orm::{ConnectionFactory, ConnectionHandle};
use crate::retry::with_retry;
use crate::tokens::ModuleId;
use async_trait::async_trait;
use std::sync::Arc;

/// Produces connection options asynchronously for deferred registration
#[async_trait]
pub trait OptionsProvider: Send + Sync {
    /// Resolve the options for the connection known by `name`
    async fn connection_options(&self, name: Option<&str>) -> Result<ConnectionOptions>;
}

/// A resolved options value can stand in for a provider
#[async_trait]
impl OptionsProvider for ConnectionOptions {
    async fn connection_options(&self, _name: Option<&str>) -> Result<ConnectionOptions> {
        Ok(self.clone())
    }
}

/// A deferred connection registration
///
/// Each registration mints its own [`ModuleId`], so registering the same
/// provider twice yields two distinguishable registrations.
pub struct DeferredOptions {
    name: Option<String>,
    module_id: ModuleId,
    provider: Arc<dyn OptionsProvider>,
}

impl DeferredOptions {
    pub fn new(name: Option<String>, provider: Arc<dyn OptionsProvider>) -> Self {
        Self {
            name,
            module_id: ModuleId::mint(),
            provider,
        }
    }

    /// Name this registration was declared under, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Identity minted for this registration
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }
}

/// Builds live connection handles from configuration values
pub struct ConnectionBootstrapper {
    entities: Arc<EntityRegistry>,
    factory: Arc<dyn ConnectionFactory>,
}

impl ConnectionBootstrapper {
    pub fn new(entities: Arc<EntityRegistry>, factory: Arc<dyn ConnectionFactory>) -> Self {
        Self { entities, factory }
    }

    /// Bootstrap a connection from eagerly supplied options
    ///
    /// The whole connect sequence (construct, attach models,
    /// authenticate, synchronize) runs under the retry policy carried by
    /// the options. After the attempt budget is exhausted the failure
    /// propagates to the caller as a startup fault.
    pub async fn bootstrap(&self, options: &ConnectionOptions) -> Result<ConnectionHandle> {
        with_retry(options.retry_policy(), || self.attempt(options)).await
    }

    /// Bootstrap a connection whose options are resolved asynchronously
    ///
    /// Provider failure is not retried: only the connect sequence is
    /// under the retry budget, so a broken configuration source surfaces
    /// immediately. A name on the registration overrides whatever name
    /// the provider resolved.
    pub async fn bootstrap_deferred(&self, deferred: &DeferredOptions) -> Result<ConnectionHandle> {
        let mut options = deferred
            .provider
            .connection_options(deferred.name())
            .await?;

        if let Some(name) = deferred.name() {
            options.name = Some(name.to_string());
        }

        log::debug!(
            "Bootstrapping deferred connection '{}' (registration {})",
            options.connection_name(),
            deferred.module_id()
        );
        self.bootstrap(&options).await
    }

    async fn attempt(&self, options: &ConnectionOptions) -> Result<ConnectionHandle> {
        let connection = self.factory.create(&options.orm);

        if !options.auto_load_models {
            return Ok(connection);
        }

        let name = options.connection_name();
        let models = self.entities.lookup(name).await;
        log::info!(
            "Attaching {} models to connection '{}'",
            models.len(),
            name
        );
        connection.add_models(models);

        connection.authenticate().await?;

        if options.synchronize_enabled() {
            connection.sync(options.sync.as_ref()).await?;
        }

        log::info!("Connection '{}' established", name);
        Ok(connection)
    }
}
