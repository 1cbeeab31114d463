//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = SqliteError::MigrationFailed {
            version: 2,
            name: "add_job_task".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_job_task) failed: syntax error"
        );
    }

    #[test]
    fn test_serialization_error_from() {
        let json_err = serde_json::from_str::<i64>("nope").unwrap_err();
        let sqlite_err: SqliteError = json_err.into();
        assert!(sqlite_err.to_string().starts_with("Serialization error"));
    }
}
