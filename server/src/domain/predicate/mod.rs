//! Criteria to predicate compilation
//!
//! - `types` - conditions, joins and the composed [`Predicate`]
//! - `compiler` - turns a criteria into a predicate using the entity's field table

mod compiler;
mod types;

pub use compiler::compile;
pub use types::{Column, CompareOp, Condition, Join, Predicate, SqlParams, SqlValue};
