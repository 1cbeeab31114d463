//! Per-entity filter criteria
//!
//! A criteria holds one optional filter slot per declared field and one per
//! relation (a `LongFilter` on the related id). Criteria are plain values:
//! `Clone` is a deep copy and `PartialEq` compares every slot.
//!
//! Inbound parameters use `field.operator=value` keys, for example
//! `jobTitle.contains=Dev` or `departmentId.in=1,2`. Keys without a dot
//! (`page`, `size`, `sort`, `query`) are not filters and are skipped.

mod error;

pub use error::CriteriaError;

use std::collections::HashSet;
use std::fmt;

use crate::core::constants::MAX_FILTER_VALUES;
use crate::data::types::Entity;
use crate::domain::filter::{BindError, FilterSlot, Operator};
use crate::domain::model::EntityMeta;

/// Declares a criteria struct and its slot lookup table.
///
/// ```ignore
/// criteria! {
///     /// Filters for jobs
///     pub struct JobCriteria for JobRow {
///         id: LongFilter = "id",
///         job_title: StringFilter = "jobTitle",
///     }
/// }
/// ```
macro_rules! criteria {
    (
        $(#[$attr:meta])*
        pub struct $name:ident for $entity:ty {
            $( $slot:ident : $filter:ty = $api:literal ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $( pub $slot: Option<$filter>, )*
        }

        impl $crate::domain::criteria::Criteria for $name {
            type Entity = $entity;

            const SLOTS: &'static [&'static str] = &[$($api),*];

            fn slot(&self, name: &str) -> Option<&dyn $crate::domain::filter::FilterSlot> {
                match name {
                    $( $api => Some(&self.$slot), )*
                    _ => None,
                }
            }

            fn slot_mut(
                &mut self,
                name: &str,
            ) -> Option<&mut dyn $crate::domain::filter::FilterSlot> {
                match name {
                    $( $api => Some(&mut self.$slot), )*
                    _ => None,
                }
            }
        }
    };
}

pub mod country;
pub mod department;
pub mod employee;
pub mod job;
pub mod location;
pub mod region;
pub mod task;

pub use country::CountryCriteria;
pub use department::DepartmentCriteria;
pub use employee::EmployeeCriteria;
pub use job::JobCriteria;
pub use location::LocationCriteria;
pub use region::RegionCriteria;
pub use task::TaskCriteria;

/// Field tables of every entity, in dependency order
pub static ENTITIES: [&EntityMeta; 7] = [
    &region::REGION,
    &country::COUNTRY,
    &location::LOCATION,
    &department::DEPARTMENT,
    &task::TASK,
    &employee::EMPLOYEE,
    &job::JOB,
];

/// Filter bundle for one entity type
pub trait Criteria: fmt::Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    type Entity: Entity;

    /// API names of all slots, in declaration order
    const SLOTS: &'static [&'static str];

    fn slot(&self, name: &str) -> Option<&dyn FilterSlot>;

    fn slot_mut(&mut self, name: &str) -> Option<&mut dyn FilterSlot>;

    /// True when no slot holds a non-empty filter
    fn is_empty(&self) -> bool {
        Self::SLOTS.iter().all(|name| {
            self.slot(name)
                .and_then(|s| s.filter())
                .is_none_or(|f| f.is_empty())
        })
    }

    /// Build a criteria from `field.operator=value` pairs (last value wins)
    fn from_params(params: &[(String, String)]) -> Result<Self, CriteriaError> {
        let entity = Self::Entity::META.name;
        let mut criteria = Self::default();

        for (key, raw) in params {
            let Some((field, op_name)) = key.rsplit_once('.') else {
                continue;
            };
            let operator =
                Operator::from_name(op_name).ok_or_else(|| CriteriaError::UnknownOperator {
                    field: field.to_string(),
                    operator: op_name.to_string(),
                })?;
            if matches!(operator, Operator::In | Operator::NotIn)
                && raw.split(',').count() > MAX_FILTER_VALUES
            {
                return Err(CriteriaError::TooManyValues {
                    field: field.to_string(),
                    max: MAX_FILTER_VALUES,
                });
            }

            let slot = criteria
                .slot_mut(field)
                .ok_or_else(|| CriteriaError::UnknownField {
                    entity,
                    field: field.to_string(),
                })?;
            let kind = slot.kind();
            slot.bind(operator, raw).map_err(|e| match e {
                BindError::Unsupported => CriteriaError::UnsupportedOperator {
                    field: field.to_string(),
                    operator,
                    kind,
                },
                BindError::Invalid(reason) => CriteriaError::InvalidValue {
                    field: field.to_string(),
                    operator,
                    reason,
                },
            })?;
        }

        tracing::trace!(entity, criteria = ?criteria, "Bound criteria");
        Ok(criteria)
    }
}

/// Check a criteria type against its entity's field table.
///
/// Every declared field and relation must resolve to a slot of the declared
/// kind, names must be unique, every slot must be declared, and relation
/// aliases must not shadow the root table. Run once per entity at startup.
pub fn validate<C: Criteria>() -> Result<(), CriteriaError> {
    let meta = C::Entity::META;
    let fail = |reason: String| CriteriaError::Declaration {
        entity: meta.name,
        reason,
    };
    let empty = C::default();
    let mut seen = HashSet::new();

    for (name, kind) in meta.filter_names() {
        if !seen.insert(name) {
            return Err(fail(format!("duplicate filter name '{}'", name)));
        }
        let slot = empty
            .slot(name)
            .ok_or_else(|| fail(format!("no slot for declared filter '{}'", name)))?;
        if slot.kind() != kind {
            return Err(fail(format!(
                "slot '{}' is {} but declared {}",
                name,
                slot.kind(),
                kind
            )));
        }
    }

    if let Some(extra) = C::SLOTS.iter().find(|s| !seen.contains(*s)) {
        return Err(fail(format!("slot '{}' is not declared", extra)));
    }

    let mut aliases = HashSet::new();
    for relation in meta.relations {
        if relation.name == meta.table || !aliases.insert(relation.name) {
            return Err(fail(format!("relation alias '{}' is ambiguous", relation.name)));
        }
    }

    tracing::trace!(entity = meta.name, "Criteria declaration valid");
    Ok(())
}

/// Validate every entity's criteria declaration
pub fn validate_all() -> Result<(), CriteriaError> {
    validate::<RegionCriteria>()?;
    validate::<CountryCriteria>()?;
    validate::<LocationCriteria>()?;
    validate::<DepartmentCriteria>()?;
    validate::<TaskCriteria>()?;
    validate::<EmployeeCriteria>()?;
    validate::<JobCriteria>()?;
    Ok(())
}
