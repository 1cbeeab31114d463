//! Repository trait implementations for SQLite
//!
//! [`SqliteRepository`] binds the generic repository functions to one entity
//! type and exposes them through [`RelationalProvider`] and
//! [`EntityRepository`].

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::{EntityRepository, RelationalProvider};
use crate::data::types::Entity;
use crate::domain::predicate::Predicate;
use crate::domain::query::{Page, PageRequest};

use super::SqlitePool;
use super::repositories::records;

/// SQLite-backed repository for one entity type
pub struct SqliteRepository<E> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> SqliteRepository<E> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> RelationalProvider<E> for SqliteRepository<E> {
    async fn find_all(&self, predicate: &Predicate) -> Result<Vec<E>, DataError> {
        records::find_all(&self.pool, predicate)
            .await
            .map_err(Into::into)
    }

    async fn find_page(
        &self,
        predicate: &Predicate,
        page: &PageRequest,
    ) -> Result<Page<E>, DataError> {
        records::find_page(&self.pool, predicate, page)
            .await
            .map_err(Into::into)
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, DataError> {
        records::count(&self.pool, predicate)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for SqliteRepository<E> {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, DataError> {
        records::find_by_id(&self.pool, id)
            .await
            .map_err(Into::into)
    }

    async fn insert(&self, entity: &E) -> Result<E, DataError> {
        records::insert(&self.pool, entity)
            .await
            .map_err(Into::into)
    }

    async fn update(&self, entity: &E) -> Result<Option<E>, DataError> {
        let Some(id) = entity.id() else {
            return Ok(None);
        };
        records::update(&self.pool, entity, id)
            .await
            .map_err(Into::into)
    }

    async fn delete(&self, id: i64) -> Result<bool, DataError> {
        records::delete::<E>(&self.pool, id)
            .await
            .map_err(Into::into)
    }
}
