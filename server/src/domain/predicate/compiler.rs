//! Predicate compiler
//!
//! Walks the entity's field table in declaration order, then its relations,
//! and ANDs together the conditions of every non-empty filter. Relations are
//! reached through an outer join so that `specified=false` on a relation
//! still matches rows with no related entity.

use super::types::{Column, Predicate};
use crate::data::types::Entity;
use crate::domain::criteria::Criteria;

/// Compile a criteria into a predicate over its entity's root table.
///
/// `None` and an empty criteria both yield the identity predicate.
pub fn compile<C: Criteria>(criteria: Option<&C>) -> Predicate {
    let meta = C::Entity::META;
    let mut predicate = Predicate::all(meta.table);
    let Some(criteria) = criteria else {
        return predicate;
    };

    for field in meta.fields {
        if let Some(filter) = active_filter(criteria, field.name) {
            predicate = predicate.and(filter.conditions(Column::new(meta.table, field.column)));
        }
    }

    for relation in meta.relations {
        if let Some(filter) = active_filter(criteria, relation.filter) {
            let (join, column) = relation.resolve(meta.table);
            predicate = predicate.join(join).and(filter.conditions(column));
        }
    }

    predicate
}

fn active_filter<'a, C: Criteria>(
    criteria: &'a C,
    name: &str,
) -> Option<&'a dyn crate::domain::filter::FilterConditions> {
    criteria
        .slot(name)
        .and_then(|slot| slot.filter())
        .filter(|f| !f.is_empty())
}
