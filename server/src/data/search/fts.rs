//! SQLite FTS5 backend
//!
//! Lives in its own database file next to the primary store. Each entity gets
//! one `search_{table}` virtual table whose columns are the entity's API
//! field names plus an unindexed `doc` column holding the full row as JSON.
//! The FTS rowid is the entity id.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::ConnectOptions;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::log::LevelFilter;

use super::backend::{SearchBackend, SearchDocument};
use super::error::SearchError;
use crate::core::constants::{SEARCH_MAX_CONNECTIONS, SQLITE_BUSY_TIMEOUT_SECS};
use crate::domain::model::EntityMeta;

pub struct FtsSearch {
    pool: SqlitePool,
}

impl FtsSearch {
    /// Open (or create) the index database and its tables
    pub async fn open(path: &Path, entities: &[&'static EntityMeta]) -> Result<Self, SearchError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .log_statements(LevelFilter::Trace);
        let pool = SqlitePoolOptions::new()
            .max_connections(SEARCH_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let backend = Self { pool };
        backend.create_tables(entities).await?;
        tracing::debug!(path = %path.display(), "Search index opened");
        Ok(backend)
    }

    #[cfg(test)]
    pub async fn in_memory(entities: &[&'static EntityMeta]) -> Result<Self, SearchError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;
        let backend = Self { pool };
        backend.create_tables(entities).await?;
        Ok(backend)
    }

    async fn create_tables(&self, entities: &[&'static EntityMeta]) -> Result<(), SearchError> {
        for meta in entities {
            let columns: Vec<&str> = meta.fields.iter().map(|f| f.name).collect();
            let sql = format!(
                "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5({}, doc UNINDEXED)",
                table_name(meta),
                columns.join(", ")
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn table_name(meta: &EntityMeta) -> String {
    format!("search_{}", meta.table)
}

#[async_trait]
impl SearchBackend for FtsSearch {
    async fn upsert(
        &self,
        meta: &'static EntityMeta,
        doc: SearchDocument,
    ) -> Result<(), SearchError> {
        let table = table_name(meta);
        let columns: Vec<&str> = doc.fields.iter().map(|(name, _)| *name).collect();
        let placeholders = vec!["?"; columns.len() + 2].join(", ");
        let insert = format!(
            "INSERT INTO {} (rowid, {}, doc) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!("DELETE FROM {} WHERE rowid = ?", table))
            .bind(doc.id)
            .execute(&mut *tx)
            .await?;
        let mut query = sqlx::query(&insert).bind(doc.id);
        for (_, value) in doc.fields {
            query = query.bind(value);
        }
        query
            .bind(serde_json::to_string(&doc.source)?)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, meta: &'static EntityMeta, id: i64) -> Result<(), SearchError> {
        sqlx::query(&format!("DELETE FROM {} WHERE rowid = ?", table_name(meta)))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn search(
        &self,
        meta: &'static EntityMeta,
        expression: Option<&str>,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<Value>, u64), SearchError> {
        let table = table_name(meta);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let (total, docs): (i64, Vec<String>) = match expression {
            Some(expr) => {
                let total = sqlx::query_scalar(&format!(
                    "SELECT COUNT(*) FROM {table} WHERE {table} MATCH ?"
                ))
                .bind(expr)
                .fetch_one(&self.pool)
                .await?;
                let docs = sqlx::query_scalar(&format!(
                    "SELECT doc FROM {table} WHERE {table} MATCH ? ORDER BY rank, rowid LIMIT ? OFFSET ?"
                ))
                .bind(expr)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (total, docs)
            }
            None => {
                let total = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(&self.pool)
                    .await?;
                let docs = sqlx::query_scalar(&format!(
                    "SELECT doc FROM {table} ORDER BY rowid LIMIT ? OFFSET ?"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (total, docs)
            }
        };

        let docs = docs
            .iter()
            .map(|d| serde_json::from_str(d))
            .collect::<Result<Vec<Value>, _>>()?;
        Ok((docs, total as u64))
    }

    async fn clear(&self, meta: &'static EntityMeta) -> Result<(), SearchError> {
        sqlx::query(&format!("DELETE FROM {}", table_name(meta)))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Search index closed");
    }

    fn backend_name(&self) -> &'static str {
        "sqlite-fts5"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::criteria::job::JOB;

    fn doc(id: i64, title: &str) -> SearchDocument {
        SearchDocument {
            id,
            fields: vec![
                ("id", Some(id.to_string())),
                ("jobTitle", Some(title.to_string())),
                ("minSalary", None),
                ("maxSalary", None),
            ],
            source: json!({ "id": id, "job_title": title }),
        }
    }

    async fn backend() -> FtsSearch {
        FtsSearch::in_memory(&[&JOB]).await.unwrap()
    }

    #[tokio::test]
    async fn test_upsert_and_match() {
        let fts = backend().await;
        fts.upsert(&JOB, doc(1, "Senior Developer")).await.unwrap();
        fts.upsert(&JOB, doc(2, "Tester")).await.unwrap();

        let (docs, total) = fts.search(&JOB, Some("\"develop\" *"), 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(docs, vec![json!({ "id": 1, "job_title": "Senior Developer" })]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_document() {
        let fts = backend().await;
        fts.upsert(&JOB, doc(1, "Developer")).await.unwrap();
        fts.upsert(&JOB, doc(1, "Architect")).await.unwrap();

        let (_, total) = fts.search(&JOB, None, 10, 0).await.unwrap();
        assert_eq!(total, 1);
        let (_, total) = fts.search(&JOB, Some("\"developer\""), 10, 0).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_column_filter_and_paging() {
        let fts = backend().await;
        for id in 1..=5 {
            fts.upsert(&JOB, doc(id, "Engineer")).await.unwrap();
        }
        let (docs, total) = fts
            .search(&JOB, Some("jobTitle : \"engineer\""), 2, 2)
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let fts = backend().await;
        fts.upsert(&JOB, doc(1, "A")).await.unwrap();
        fts.upsert(&JOB, doc(2, "B")).await.unwrap();

        fts.remove(&JOB, 1).await.unwrap();
        fts.remove(&JOB, 99).await.unwrap();
        let (docs, total) = fts.search(&JOB, None, 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(docs[0]["id"], 2);

        fts.clear(&JOB).await.unwrap();
        assert_eq!(fts.search(&JOB, None, 10, 0).await.unwrap().1, 0);
    }
}
