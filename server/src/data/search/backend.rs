//! Search backend trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::error::SearchError;
use crate::domain::model::EntityMeta;

/// One entity as stored in the mirror
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDocument {
    pub id: i64,
    /// Searchable text per API field name, `None` for null columns
    pub fields: Vec<(&'static str, Option<String>)>,
    /// Full row, returned as-is by searches
    pub source: Value,
}

/// Search backend trait
///
/// The mirror is eventually consistent with the primary store: a failed write
/// here never undoes the store write that triggered it.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Insert or replace a document
    async fn upsert(&self, meta: &'static EntityMeta, doc: SearchDocument)
    -> Result<(), SearchError>;

    /// Remove a document; removing an unknown id is not an error
    async fn remove(&self, meta: &'static EntityMeta, id: i64) -> Result<(), SearchError>;

    /// Ranked page of stored rows for an already translated match expression.
    ///
    /// `None` matches every document in id order.
    async fn search(
        &self,
        meta: &'static EntityMeta,
        expression: Option<&str>,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<Value>, u64), SearchError>;

    /// Drop every document of one entity
    async fn clear(&self, meta: &'static EntityMeta) -> Result<(), SearchError>;

    /// Release connections on shutdown
    async fn close(&self) {}

    /// Backend name for debugging/logging
    fn backend_name(&self) -> &'static str;
}
