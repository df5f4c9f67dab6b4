//! Lookup-key derivation and module identity tokens

use crate::config::DEFAULT_CONNECTION_NAME;
use std::fmt;
use uuid::Uuid;

/// Derive the lookup key a connection is published under
///
/// The default connection keeps the well-known name; a named connection
/// gets a `Connection` suffix so the key cannot collide with other kinds
/// of entries a host application keeps in the same namespace.
pub fn connection_token(name: Option<&str>) -> String {
    match name.filter(|name| !name.is_empty() && *name != DEFAULT_CONNECTION_NAME) {
        Some(name) => format!("{}Connection", name),
        None => DEFAULT_CONNECTION_NAME.to_string(),
    }
}

/// Process-unique identity minted per deferred registration
///
/// Registering the same deferred module twice must yield distinguishable
/// registrations; the identity token is what tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
