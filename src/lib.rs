//! ormlink - ORM connection bootstrapping for application startup
//!
//! ormlink wires an ORM backend into an application's composition root:
//! - modules register which data models belong to which named connection
//! - a bootstrapper builds each live connection from its configuration,
//!   attaching the registered models, verifying connectivity and
//!   synchronizing schema, with bounded fixed-delay retry
//! - a connection registry publishes the resulting handles for lookup by
//!   name and closes each exactly once at shutdown
//!
//! Connection pooling, SQL generation and schema synchronization are the
//! ORM backend's business behind the [`orm::OrmConnection`] seam; this
//! crate is the bookkeeping between the two.

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

pub mod bootstrap;
pub mod config;
pub mod connections;
pub mod entities;
pub mod error;
pub mod orm;
pub mod retry;
pub mod tokens;

// Re-export main types for public API
pub use bootstrap::{ConnectionBootstrapper, DeferredOptions, OptionsProvider};
pub use config::{
    ConnectionOptions, ConnectionOptionsBuilder, OrmOptions, SyncOptions, DEFAULT_CONNECTION_NAME,
};
pub use connections::ConnectionRegistry;
pub use entities::{ConnectionToken, EntityRegistry};
pub use error::{Error, Result};
pub use orm::{ConnectionFactory, ConnectionHandle, Model, OrmConnection};
pub use retry::{with_retry, RetryPolicy};
pub use tokens::{connection_token, ModuleId};
