//! Row types for the HR entities
//!
//! Rows mirror their tables one to one: field names are column names and
//! every non-key column is nullable. Instants are stored as epoch
//! milliseconds.

mod hr;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use crate::domain::model::EntityMeta;

pub use hr::{CountryRow, DepartmentRow, EmployeeRow, JobRow, LocationRow, RegionRow, TaskRow};

/// A persisted entity with a generated integer identifier
pub trait Entity:
    Serialize
    + DeserializeOwned
    + for<'r> FromRow<'r, SqliteRow>
    + Clone
    + Default
    + fmt::Debug
    + Send
    + Sync
    + Unpin
    + 'static
{
    const META: &'static EntityMeta;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Ids held by an owned many-to-many relation
    fn linked_ids(&self, _relation: &str) -> &[i64] {
        &[]
    }

    fn set_linked_ids(&mut self, _relation: &str, _ids: Vec<i64>) {}
}
