//! Search mirror
//!
//! A secondary full-text index kept eventually consistent with the primary
//! store. Pluggable backends:
//! - SQLite FTS5 (default) - separate database file under the data directory
//! - Disabled - writes are no-ops, searches fail with "service unavailable"

mod backend;
mod disabled;
mod error;
mod fts;
pub mod query;

use std::sync::Arc;

use chrono::DateTime;
use serde_json::Value;

pub use backend::{SearchBackend, SearchDocument};
pub use error::SearchError;

use disabled::DisabledSearch;
use fts::FtsSearch;

use crate::core::config::SearchConfig;
use crate::core::constants::SEARCH_DB_FILENAME;
use crate::core::storage::{AppStorage, DataSubdir};
use crate::data::types::Entity;
use crate::domain::criteria::ENTITIES;
use crate::domain::filter::FilterKind;
use crate::domain::query::{Page, PageRequest};

/// Search service providing typed access to the search backend
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl SearchService {
    /// Create the search service from configuration
    pub async fn new(config: &SearchConfig, storage: &AppStorage) -> Result<Self, SearchError> {
        if !config.enabled {
            tracing::debug!("Search mirror disabled");
            return Ok(Self::disabled());
        }
        let path = storage.subdir(DataSubdir::Search).join(SEARCH_DB_FILENAME);
        let backend = FtsSearch::open(&path, &ENTITIES).await?;
        Ok(Self::from_backend(Arc::new(backend)))
    }

    pub fn disabled() -> Self {
        Self::from_backend(Arc::new(DisabledSearch))
    }

    pub fn from_backend(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// FTS5 mirror over an in-memory database
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, SearchError> {
        let backend = FtsSearch::in_memory(&ENTITIES).await?;
        Ok(Self::from_backend(Arc::new(backend)))
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    // =========================================================================
    // Typed API
    // =========================================================================

    /// Insert or replace the document for one row
    pub async fn index<E: Entity>(&self, id: i64, entity: &E) -> Result<(), SearchError> {
        let doc = document(id, entity)?;
        self.backend.upsert(E::META, doc).await
    }

    pub async fn remove<E: Entity>(&self, id: i64) -> Result<(), SearchError> {
        self.backend.remove(E::META, id).await
    }

    /// Ranked page of rows matching a free-text query
    pub async fn search<E: Entity>(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<E>, SearchError> {
        let fields: Vec<&str> = E::META.fields.iter().map(|f| f.name).collect();
        let expression = query::translate(query, &fields)?;
        tracing::debug!(entity = E::META.name, query, ?expression, "search");

        let (docs, total) = self
            .backend
            .search(E::META, expression.as_deref(), page.size, page.offset())
            .await?;
        let items = docs
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<E>, _>>()?;
        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total,
        })
    }

    /// Replace every document of one entity with the given rows
    pub async fn rebuild<E: Entity>(&self, rows: &[E]) -> Result<usize, SearchError> {
        self.backend.clear(E::META).await?;
        let mut indexed = 0;
        for row in rows {
            if let Some(id) = row.id() {
                self.index(id, row).await?;
                indexed += 1;
            }
        }
        Ok(indexed)
    }

    pub async fn close(&self) {
        self.backend.close().await;
    }
}

/// Build the mirror document: searchable text per API field plus the full row
fn document<E: Entity>(id: i64, entity: &E) -> Result<SearchDocument, SearchError> {
    let source = serde_json::to_value(entity)?;
    let fields = E::META
        .fields
        .iter()
        .map(|field| {
            let text = match source.get(field.column) {
                Some(Value::Number(n)) if field.kind == FilterKind::Instant => n
                    .as_i64()
                    .and_then(DateTime::from_timestamp_millis)
                    .map(|t| t.to_rfc3339()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            };
            (field.name, text)
        })
        .collect();
    Ok(SearchDocument { id, fields, source })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::data::types::{EmployeeRow, JobRow};

    async fn service() -> SearchService {
        SearchService::in_memory().await.unwrap()
    }

    fn job(id: i64, title: &str) -> JobRow {
        JobRow {
            id: Some(id),
            job_title: Some(title.into()),
            task_ids: vec![7],
            ..Default::default()
        }
    }

    #[test]
    fn test_document_formats_instants() {
        let hired = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        let employee = EmployeeRow {
            id: Some(3),
            first_name: Some("Ada".into()),
            hire_date: Some(hired.timestamp_millis()),
            ..Default::default()
        };
        let doc = document(3, &employee).unwrap();
        assert_eq!(doc.id, 3);
        assert!(doc.fields.contains(&("firstName", Some("Ada".to_string()))));
        assert!(doc.fields.contains(&("hireDate", Some(hired.to_rfc3339()))));
        assert!(doc.fields.contains(&("email", None)));
        assert_eq!(doc.source["first_name"], "Ada");
    }

    #[tokio::test]
    async fn test_index_and_search_roundtrip() {
        let search = service().await;
        search.index(1, &job(1, "Developer")).await.unwrap();
        search.index(2, &job(2, "Designer")).await.unwrap();

        let page = search
            .search::<JobRow>("jobTitle:dev*", &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items, vec![job(1, "Developer")]);

        let all = search
            .search::<JobRow>("*", &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(all.total, 2);
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_field() {
        let search = service().await;
        let err = search
            .search::<JobRow>("salary:10", &PageRequest::new(1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_rebuild_replaces_index() {
        let search = service().await;
        search.index(9, &job(9, "Stale")).await.unwrap();

        let rows = vec![job(1, "Developer"), job(2, "Tester")];
        assert_eq!(search.rebuild(&rows).await.unwrap(), 2);

        let page = search
            .search::<JobRow>("stale", &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_disabled_service() {
        let search = SearchService::disabled();
        assert_eq!(search.backend_name(), "disabled");
        search.index(1, &job(1, "Developer")).await.unwrap();
        assert!(matches!(
            search
                .search::<JobRow>("dev", &PageRequest::new(1, 10))
                .await,
            Err(SearchError::Disabled)
        ));
    }
}
