//! SQLite repository functions
//!
//! Free functions generic over the entity type. Every query is assembled from
//! the entity's field table and a compiled predicate, so the same code serves
//! all seven tables.

pub mod links;
pub mod records;

use sqlx::Arguments;
use sqlx::sqlite::SqliteArguments;

use crate::data::sqlite::SqliteError;
use crate::domain::predicate::SqlValue;

/// Bind collected values in placeholder order
fn arguments<'q>(values: Vec<SqlValue>) -> Result<SqliteArguments<'q>, SqliteError> {
    let mut args = SqliteArguments::default();
    for value in values {
        match value {
            SqlValue::Integer(v) => args.add(v),
            SqlValue::Real(v) => args.add(v),
            SqlValue::Text(v) => args.add(v),
            SqlValue::Null => args.add(None::<i64>),
        }
        .map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}
