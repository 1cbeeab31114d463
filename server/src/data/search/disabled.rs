//! No-op backend used when the mirror is turned off

use async_trait::async_trait;
use serde_json::Value;

use super::backend::{SearchBackend, SearchDocument};
use super::error::SearchError;
use crate::domain::model::EntityMeta;

/// Accepts writes and refuses searches
pub struct DisabledSearch;

#[async_trait]
impl SearchBackend for DisabledSearch {
    async fn upsert(
        &self,
        _meta: &'static EntityMeta,
        _doc: SearchDocument,
    ) -> Result<(), SearchError> {
        Ok(())
    }

    async fn remove(&self, _meta: &'static EntityMeta, _id: i64) -> Result<(), SearchError> {
        Ok(())
    }

    async fn search(
        &self,
        _meta: &'static EntityMeta,
        _expression: Option<&str>,
        _limit: u32,
        _offset: u64,
    ) -> Result<(Vec<Value>, u64), SearchError> {
        Err(SearchError::Disabled)
    }

    async fn clear(&self, _meta: &'static EntityMeta) -> Result<(), SearchError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}
