use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ormlink
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("Schema synchronization error: {0}")]
    SchemaSync(String),

    #[error("Options provider error: {0}")]
    OptionsProvider(String),

    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn database_connection(msg: impl Into<String>) -> Self {
        Self::DatabaseConnection(msg.into())
    }

    pub fn schema_sync(msg: impl Into<String>) -> Self {
        Self::SchemaSync(msg.into())
    }

    pub fn options_provider(msg: impl Into<String>) -> Self {
        Self::OptionsProvider(msg.into())
    }
}
