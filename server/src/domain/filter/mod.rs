//! Typed per-field filters
//!
//! - `value` - Value types a filter can carry and how they parse and bind
//! - `types` - `Filter`, `RangeFilter` and `StringFilter`
//! - `params` - Operator names and binding from raw query parameters

mod params;
mod types;
mod value;

pub use params::{BindError, FilterOps, FilterSlot, Operator};
pub use types::{
    DoubleFilter, Filter, FilterConditions, InstantFilter, LongFilter, RangeFilter, StringFilter,
};
pub use value::{FilterKind, FilterValue};
