//! Search mirror error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search is disabled")]
    Disabled,

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Search index error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_display() {
        let err = SearchError::InvalidQuery("unknown field 'salary'".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid search query: unknown field 'salary'"
        );
    }

    #[test]
    fn test_disabled_display() {
        assert_eq!(SearchError::Disabled.to_string(), "Search is disabled");
    }
}
