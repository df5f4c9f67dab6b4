//! Opaque seam to the underlying ORM
//!
//! The hard work of pooling, SQL generation and schema synchronization
//! belongs to the ORM backend. This crate only needs the capability set
//! below and never inspects a connection's internals.

use crate::config::{OrmOptions, SyncOptions};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A data-model definition
///
/// Only identity and the name (for logging and lookups) are observed;
/// what a model means is the ORM backend's business.
pub trait Model: Send + Sync {
    fn name(&self) -> &str;
}

/// A live ORM connection
///
/// Implementations are shared behind [`ConnectionHandle`], so model
/// attachment takes `&self` and relies on interior mutability.
#[async_trait]
pub trait OrmConnection: Send + Sync {
    /// Attach model definitions to this connection
    fn add_models(&self, models: Vec<Arc<dyn Model>>);

    /// Verify live connectivity to the backing store
    async fn authenticate(&self) -> Result<()>;

    /// Run schema synchronization
    async fn sync(&self, options: Option<&SyncOptions>) -> Result<()>;

    /// Release the connection
    async fn close(&self) -> Result<()>;
}

/// Shared handle to a live connection, owned by the composition root
/// for the lifetime of the application
pub type ConnectionHandle = Arc<dyn OrmConnection>;

/// Constructs the bare connection object from ORM-facing parameters
///
/// Construction itself is synchronous and does not fail; connectivity
/// problems surface on the subsequent authenticate step, which is what
/// the bootstrap retry loop covers.
pub trait ConnectionFactory: Send + Sync {
    fn create(&self, options: &OrmOptions) -> ConnectionHandle;
}

impl<F> ConnectionFactory for F
where
    F: Fn(&OrmOptions) -> ConnectionHandle + Send + Sync,
{
    fn create(&self, options: &OrmOptions) -> ConnectionHandle {
        self(options)
    }
}
