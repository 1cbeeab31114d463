//! Domain logic for HR records
//!
//! - `model` - Static entity declarations (fields, relations)
//! - `filter` - Typed filter value objects and operators
//! - `criteria` - Per-entity criteria bound from query parameters
//! - `predicate` - Criteria to SQL predicate compiler
//! - `query` - Read-side service, paging and sorting
//! - `records` - Write path with search mirroring

pub mod criteria;
pub mod filter;
pub mod model;
pub mod predicate;
pub mod query;
pub mod records;
