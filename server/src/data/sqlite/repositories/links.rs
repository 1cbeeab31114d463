//! Owned many-to-many links (e.g. `job_task`)
//!
//! Links are written by the owning side only, inside the same transaction as
//! the owning row, and loaded with a single `IN` query per relation.

use std::collections::{BTreeSet, HashMap};

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::arguments;
use crate::data::sqlite::SqliteError;
use crate::data::types::Entity;
use crate::domain::predicate::SqlValue;

/// Fill the linked ids of every owned relation for the given rows
pub async fn load<E: Entity>(pool: &SqlitePool, rows: &mut [E]) -> Result<(), SqliteError> {
    let ids: Vec<i64> = rows.iter().filter_map(Entity::id).collect();
    if ids.is_empty() {
        return Ok(());
    }

    for relation in E::META.owned_links() {
        let Some((table, source, target)) = relation.owned_link() else {
            continue;
        };
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {source}, {target} FROM {table} WHERE {source} IN ({placeholders}) ORDER BY {source}, {target}"
        );
        let values = ids.iter().copied().map(SqlValue::Integer).collect();
        let pairs: Vec<(i64, i64)> = sqlx::query_as_with(&sql, arguments(values)?)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
        for (owner, linked) in pairs {
            grouped.entry(owner).or_default().push(linked);
        }
        for row in rows.iter_mut() {
            let linked = row
                .id()
                .and_then(|id| grouped.remove(&id))
                .unwrap_or_default();
            row.set_linked_ids(relation.name, linked);
        }
    }
    Ok(())
}

/// Replace the links of the row `id` with the entity's current linked ids
pub async fn replace<E: Entity>(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &E,
    id: i64,
) -> Result<(), SqliteError> {
    for relation in E::META.owned_links() {
        let Some((table, source, target)) = relation.owned_link() else {
            continue;
        };
        sqlx::query(&format!("DELETE FROM {table} WHERE {source} = ?"))
            .bind(id)
            .execute(&mut **tx)
            .await?;

        let linked: BTreeSet<i64> = entity.linked_ids(relation.name).iter().copied().collect();
        let insert = format!("INSERT INTO {table} ({source}, {target}) VALUES (?, ?)");
        for linked_id in linked {
            sqlx::query(&insert)
                .bind(id)
                .bind(linked_id)
                .execute(&mut **tx)
                .await?;
        }
        tracing::trace!(relation = relation.name, id, "Links replaced");
    }
    Ok(())
}
