//! Entity write path
//!
//! Writes go to the primary store first and are then mirrored into the search
//! index. A mirror failure never rolls back the store write: it is logged and
//! reported back as [`MirrorStatus::Degraded`].
//!
//! Deleting a row cascades away the link-table rows that point at it, which
//! changes the mirrored documents of the link owners. A [`LinkedMirror`]
//! registered on the service rewrites those documents after the delete.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::data::traits::EntityRepository;
use crate::data::types::Entity;
use crate::data::{DataError, SearchError, SearchService};
use crate::domain::model::Relation;
use crate::domain::predicate::{CompareOp, Condition, Predicate, SqlValue};
use crate::domain::query::{Page, PageRequest};

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("A new {entity} cannot already have an id")]
    IdAlreadySet { entity: &'static str },

    #[error("Cannot update a {entity} without an id")]
    MissingId { entity: &'static str },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Whether the search mirror followed a store write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorStatus {
    Synced,
    Degraded(String),
}

/// Result of a store write plus the mirror outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Written<T> {
    pub value: T,
    pub mirror: MirrorStatus,
}

/// Mirrored documents of another entity that embed links to this one
#[async_trait]
pub trait LinkedMirror: Send + Sync {
    /// Ids of the rows linked to `id`
    async fn owners_of(&self, id: i64) -> Result<Vec<i64>, DataError>;

    /// Rewrite the documents of `ids` from the primary store
    async fn refresh(&self, ids: &[i64]) -> MirrorStatus;
}

/// Rows of `O` that own a link table pointing at another entity
pub struct LinkOwners<O: Entity> {
    repository: Arc<dyn EntityRepository<O>>,
    search: Arc<SearchService>,
    relation: &'static Relation,
}

impl<O: Entity> LinkOwners<O> {
    /// `None` when `O` owns no link table targeting `target`
    pub fn new(
        repository: Arc<dyn EntityRepository<O>>,
        search: Arc<SearchService>,
        target: &'static str,
    ) -> Option<Self> {
        let relation = O::META.owned_links().find(|r| r.target == target)?;
        Some(Self {
            repository,
            search,
            relation,
        })
    }
}

#[async_trait]
impl<O: Entity> LinkedMirror for LinkOwners<O> {
    async fn owners_of(&self, id: i64) -> Result<Vec<i64>, DataError> {
        let (join, column) = self.relation.resolve(O::META.table);
        let predicate = Predicate::all(O::META.table)
            .join(join)
            .and([Condition::Compare {
                column,
                op: CompareOp::Eq,
                value: SqlValue::Integer(id),
            }]);
        let rows = self.repository.find_all(&predicate).await?;
        Ok(rows.iter().filter_map(|row| row.id()).collect())
    }

    async fn refresh(&self, ids: &[i64]) -> MirrorStatus {
        let mut status = MirrorStatus::Synced;
        for &id in ids {
            let written = match self.repository.find_by_id(id).await {
                Ok(Some(row)) => self.search.index(id, &row).await.map_err(RecordError::from),
                Ok(None) => Ok(()),
                Err(e) => Err(e.into()),
            };
            if let Err(e) = written
                && status == MirrorStatus::Synced
            {
                status = degraded::<O>(id, e);
            }
        }
        status
    }
}

pub struct RecordService<E: Entity> {
    repository: Arc<dyn EntityRepository<E>>,
    search: Arc<SearchService>,
    linked: Vec<Arc<dyn LinkedMirror>>,
}

impl<E: Entity> Clone for RecordService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            search: Arc::clone(&self.search),
            linked: self.linked.clone(),
        }
    }
}

impl<E: Entity> RecordService<E> {
    pub fn new(repository: Arc<dyn EntityRepository<E>>, search: Arc<SearchService>) -> Self {
        Self {
            repository,
            search,
            linked: Vec::new(),
        }
    }

    /// Re-mirror `linked` owners whenever a row of `E` is deleted
    pub fn with_linked(mut self, linked: Arc<dyn LinkedMirror>) -> Self {
        self.linked.push(linked);
        self
    }

    pub async fn create(&self, entity: E) -> Result<Written<E>, RecordError> {
        if entity.id().is_some() {
            return Err(RecordError::IdAlreadySet {
                entity: E::META.name,
            });
        }
        let saved = self.repository.insert(&entity).await?;
        let mirror = self.mirror_upsert(&saved).await;
        Ok(Written {
            value: saved,
            mirror,
        })
    }

    pub async fn update(&self, entity: E) -> Result<Written<E>, RecordError> {
        let Some(id) = entity.id() else {
            return Err(RecordError::MissingId {
                entity: E::META.name,
            });
        };
        let saved = self
            .repository
            .update(&entity)
            .await?
            .ok_or(RecordError::NotFound {
                entity: E::META.name,
                id,
            })?;
        let mirror = self.mirror_upsert(&saved).await;
        Ok(Written {
            value: saved,
            mirror,
        })
    }

    pub async fn find_one(&self, id: i64) -> Result<E, RecordError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(RecordError::NotFound {
                entity: E::META.name,
                id,
            })
    }

    pub async fn delete(&self, id: i64) -> Result<Written<()>, RecordError> {
        // Links are gone once the row is, so collect their owners first
        let mut owners = Vec::with_capacity(self.linked.len());
        for linked in &self.linked {
            owners.push(linked.owners_of(id).await?);
        }

        if !self.repository.delete(id).await? {
            return Err(RecordError::NotFound {
                entity: E::META.name,
                id,
            });
        }
        tracing::debug!(entity = E::META.name, id, "Deleted");

        let mut mirror = match self.search.remove::<E>(id).await {
            Ok(()) => MirrorStatus::Synced,
            Err(e) => degraded::<E>(id, e),
        };
        for (linked, ids) in self.linked.iter().zip(&owners) {
            if ids.is_empty() {
                continue;
            }
            let refreshed = linked.refresh(ids).await;
            if mirror == MirrorStatus::Synced {
                mirror = refreshed;
            }
        }
        Ok(Written { value: (), mirror })
    }

    /// Free-text search against the mirror
    pub async fn search(&self, query: &str, page: &PageRequest) -> Result<Page<E>, RecordError> {
        Ok(self.search.search::<E>(query, page).await?)
    }

    /// Rebuild this entity's mirror from the primary store
    pub async fn reindex(&self) -> Result<usize, RecordError> {
        let rows = self
            .repository
            .find_all(&Predicate::all(E::META.table))
            .await?;
        let indexed = self.search.rebuild(&rows).await?;
        tracing::debug!(entity = E::META.name, indexed, "Search mirror rebuilt");
        Ok(indexed)
    }

    async fn mirror_upsert(&self, saved: &E) -> MirrorStatus {
        let Some(id) = saved.id() else {
            return MirrorStatus::Synced;
        };
        match self.search.index(id, saved).await {
            Ok(()) => MirrorStatus::Synced,
            Err(e) => degraded::<E>(id, e),
        }
    }
}

fn degraded<E: Entity>(id: i64, e: impl Display) -> MirrorStatus {
    tracing::warn!(entity = E::META.name, id, error = %e, "Search mirror write failed");
    MirrorStatus::Degraded(format!(
        "search index not updated for {} {}: {}",
        E::META.name,
        id,
        e
    ))
}
