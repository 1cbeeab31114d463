//! Repository traits for the primary store
//!
//! The query service only needs [`RelationalProvider`]; the write path needs
//! the full [`EntityRepository`]. SQLite implements both for every entity.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::Entity;
use crate::domain::predicate::Predicate;
use crate::domain::query::{Page, PageRequest};

// ============================================================================
// Relational Provider Trait
// ============================================================================

/// Executes compiled predicates against the primary store
#[async_trait]
pub trait RelationalProvider<E: Entity>: Send + Sync {
    /// Every matching row ordered by id
    async fn find_all(&self, predicate: &Predicate) -> Result<Vec<E>, DataError>;

    /// One page of matching rows with the total match count
    async fn find_page(&self, predicate: &Predicate, page: &PageRequest)
    -> Result<Page<E>, DataError>;

    /// Number of distinct matching rows
    async fn count(&self, predicate: &Predicate) -> Result<u64, DataError>;
}

// ============================================================================
// Entity Repository Trait
// ============================================================================

/// Reads and writes single entities by id
#[async_trait]
pub trait EntityRepository<E: Entity>: RelationalProvider<E> {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, DataError>;

    /// Insert a row without an id and return it with the generated id
    async fn insert(&self, entity: &E) -> Result<E, DataError>;

    /// Replace an existing row; `None` when no row has the entity's id
    async fn update(&self, entity: &E) -> Result<Option<E>, DataError>;

    /// Delete a row; `false` when it did not exist
    async fn delete(&self, id: i64) -> Result<bool, DataError>;
}
