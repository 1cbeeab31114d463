//! Unified error type for the data layer
//!
//! Wraps backend-specific errors (currently the SQLite store) while keeping
//! track of which backend produced them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error (primary store)
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Row could not be converted to or from its JSON form
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DataError {
    /// Create a migration failed error
    pub fn migration_failed(backend: &'static str, version: i32, name: &str, error: &str) -> Self {
        Self::MigrationFailed {
            backend,
            version,
            name: name.to_string(),
            error: error.to_string(),
        }
    }

    /// Backend that produced the error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::MigrationFailed { backend, .. } => backend,
            Self::Serialization(_) => "serde",
        }
    }
}

impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        match e {
            crate::data::sqlite::SqliteError::Database(e) => Self::Sqlite(e),
            crate::data::sqlite::SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "sqlite",
                version,
                name,
                error,
            },
            crate::data::sqlite::SqliteError::Serialization(e) => Self::Serialization(e),
        }
    }
}
