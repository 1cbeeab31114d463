//! Generic row reads and writes

use serde_json::Value;
use sqlx::SqlitePool;

use super::{arguments, links};
use crate::data::sqlite::SqliteError;
use crate::data::types::Entity;
use crate::domain::model::ID_COLUMN;
use crate::domain::predicate::{Predicate, SqlParams, SqlValue};
use crate::domain::query::{Page, PageRequest};

/// `SELECT [DISTINCT] root.* FROM ... WHERE ...` and its bind values
fn select_sql(predicate: &Predicate) -> (String, SqlParams) {
    let mut params = SqlParams::default();
    let where_sql = predicate.where_sql(&mut params);
    let distinct = if predicate.requires_distinct() {
        "DISTINCT "
    } else {
        ""
    };
    let sql = format!(
        "SELECT {}{}.* FROM {} WHERE {}",
        distinct,
        predicate.root(),
        predicate.from_sql(),
        where_sql
    );
    (sql, params)
}

/// Find every row matching the predicate, ordered by id
pub async fn find_all<E: Entity>(
    pool: &SqlitePool,
    predicate: &Predicate,
) -> Result<Vec<E>, SqliteError> {
    let (sql, params) = select_sql(predicate);
    let sql = format!("{} ORDER BY {}.{} ASC", sql, predicate.root(), ID_COLUMN);

    let mut rows: Vec<E> = sqlx::query_as_with(&sql, arguments(params.values)?)
        .fetch_all(pool)
        .await?;
    links::load::<E>(pool, &mut rows).await?;
    Ok(rows)
}

/// Find one page of rows plus the total match count
pub async fn find_page<E: Entity>(
    pool: &SqlitePool,
    predicate: &Predicate,
    page: &PageRequest,
) -> Result<Page<E>, SqliteError> {
    let total = count(pool, predicate).await?;

    let (sql, mut params) = select_sql(predicate);
    let sql = format!(
        "{} ORDER BY {} LIMIT ? OFFSET ?",
        sql,
        page.order_by_sql(predicate.root())
    );
    params.values.push(SqlValue::Integer(i64::from(page.size)));
    params
        .values
        .push(SqlValue::Integer(i64::try_from(page.offset()).unwrap_or(i64::MAX)));

    let mut items: Vec<E> = sqlx::query_as_with(&sql, arguments(params.values)?)
        .fetch_all(pool)
        .await?;
    links::load::<E>(pool, &mut items).await?;

    Ok(Page {
        items,
        page: page.page,
        size: page.size,
        total,
    })
}

/// Count distinct root rows matching the predicate
pub async fn count(pool: &SqlitePool, predicate: &Predicate) -> Result<u64, SqliteError> {
    let mut params = SqlParams::default();
    let where_sql = predicate.where_sql(&mut params);
    let counted = if predicate.requires_distinct() {
        format!("COUNT(DISTINCT {}.{})", predicate.root(), ID_COLUMN)
    } else {
        "COUNT(*)".to_string()
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE {}",
        counted,
        predicate.from_sql(),
        where_sql
    );

    let count: i64 = sqlx::query_scalar_with(&sql, arguments(params.values)?)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

pub async fn find_by_id<E: Entity>(pool: &SqlitePool, id: i64) -> Result<Option<E>, SqliteError> {
    let sql = format!(
        "SELECT * FROM {} WHERE {} = ?",
        E::META.table,
        ID_COLUMN
    );
    let row: Option<E> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut rows = vec![row];
    links::load::<E>(pool, &mut rows).await?;
    Ok(rows.pop())
}

/// Insert a new row (and its owned links) in one transaction
pub async fn insert<E: Entity>(pool: &SqlitePool, entity: &E) -> Result<E, SqliteError> {
    let columns = E::META.write_columns();
    let values = write_values(entity, &columns)?;
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::META.table,
        columns.join(", "),
        placeholders
    );

    let mut tx = pool.begin().await?;
    let result = sqlx::query_with(&sql, arguments(values)?)
        .execute(&mut *tx)
        .await?;
    let id = result.last_insert_rowid();
    links::replace(&mut tx, entity, id).await?;
    tx.commit().await?;

    let mut saved = entity.clone();
    saved.set_id(Some(id));
    tracing::debug!(entity = E::META.name, id, "Row inserted");
    Ok(saved)
}

/// Replace every column of an existing row; `None` when the id is unknown
pub async fn update<E: Entity>(
    pool: &SqlitePool,
    entity: &E,
    id: i64,
) -> Result<Option<E>, SqliteError> {
    let columns = E::META.write_columns();
    let mut values = write_values(entity, &columns)?;
    values.push(SqlValue::Integer(id));
    let assignments: Vec<String> = columns.iter().map(|c| format!("{} = ?", c)).collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        E::META.table,
        assignments.join(", "),
        ID_COLUMN
    );

    let mut tx = pool.begin().await?;
    let result = sqlx::query_with(&sql, arguments(values)?)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    links::replace(&mut tx, entity, id).await?;
    tx.commit().await?;

    tracing::debug!(entity = E::META.name, id, "Row updated");
    Ok(Some(entity.clone()))
}

/// Delete a row; `false` when it did not exist
pub async fn delete<E: Entity>(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let sql = format!("DELETE FROM {} WHERE {} = ?", E::META.table, ID_COLUMN);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Column values taken from the row's serialized form
fn write_values<E: Entity>(entity: &E, columns: &[&str]) -> Result<Vec<SqlValue>, SqliteError> {
    let json = serde_json::to_value(entity)?;
    Ok(columns
        .iter()
        .map(|column| match json.get(*column) {
            Some(Value::Number(n)) => n
                .as_i64()
                .map(SqlValue::Integer)
                .or_else(|| n.as_f64().map(SqlValue::Real))
                .unwrap_or(SqlValue::Null),
            Some(Value::String(s)) => SqlValue::Text(s.clone()),
            Some(Value::Bool(b)) => SqlValue::Integer(i64::from(*b)),
            _ => SqlValue::Null,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::types::{EmployeeRow, JobRow, RegionRow, TaskRow};

    async fn setup_test_pool() -> SqlitePool {
        SqliteService::in_memory().await.unwrap().pool().clone()
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let pool = setup_test_pool().await;
        let saved = insert(
            &pool,
            &EmployeeRow {
                first_name: Some("Ada".into()),
                commission_pct: Some(0.25),
                salary: Some(5000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let id = saved.id.unwrap();

        let fetched: EmployeeRow = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert!(find_by_id::<EmployeeRow>(&pool, id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_none() {
        let pool = setup_test_pool().await;
        let region = RegionRow {
            id: Some(42),
            region_name: Some("Nowhere".into()),
        };
        assert!(update(&pool, &region, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_clears_unset_columns() {
        let pool = setup_test_pool().await;
        let saved = insert(
            &pool,
            &EmployeeRow {
                first_name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let id = saved.id.unwrap();

        let changed = EmployeeRow {
            id: Some(id),
            first_name: Some("Ada".into()),
            ..Default::default()
        };
        update(&pool, &changed, id).await.unwrap().unwrap();
        let fetched: EmployeeRow = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(fetched.email, None);
    }

    #[tokio::test]
    async fn test_job_links_written_and_replaced() {
        let pool = setup_test_pool().await;
        let mut task_ids = Vec::new();
        for title in ["a", "b", "c"] {
            let task = insert(
                &pool,
                &TaskRow {
                    title: Some(title.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            task_ids.push(task.id.unwrap());
        }

        let job = insert(
            &pool,
            &JobRow {
                job_title: Some("Dev".into()),
                task_ids: vec![task_ids[2], task_ids[0]],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let id = job.id.unwrap();
        let fetched: JobRow = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(fetched.task_ids, vec![task_ids[0], task_ids[2]]);

        let replaced = JobRow {
            task_ids: vec![task_ids[1]],
            ..fetched
        };
        update(&pool, &replaced, id).await.unwrap().unwrap();
        let fetched: JobRow = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(fetched.task_ids, vec![task_ids[1]]);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = setup_test_pool().await;
        let saved = insert(&pool, &RegionRow::default()).await.unwrap();
        let id = saved.id.unwrap();
        assert!(delete::<RegionRow>(&pool, id).await.unwrap());
        assert!(!delete::<RegionRow>(&pool, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_an_error() {
        let pool = setup_test_pool().await;
        let result = insert(
            &pool,
            &EmployeeRow {
                department_id: Some(999),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(SqliteError::Database(_))));
    }

    #[tokio::test]
    async fn test_distinct_count_through_link_table() {
        let pool = setup_test_pool().await;
        let a = insert(&pool, &TaskRow::default()).await.unwrap().id.unwrap();
        let b = insert(&pool, &TaskRow::default()).await.unwrap().id.unwrap();
        insert(
            &pool,
            &JobRow {
                task_ids: vec![a, b],
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let predicate = crate::domain::predicate::compile(Some(
            &crate::domain::criteria::JobCriteria {
                task_id: Some(crate::domain::filter::LongFilter::new().with_specified(true)),
                ..Default::default()
            },
        ));
        assert_eq!(count(&pool, &predicate).await.unwrap(), 1);
        assert_eq!(find_all::<JobRow>(&pool, &predicate).await.unwrap().len(), 1);
    }
}
