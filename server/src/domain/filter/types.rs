//! Filter value objects
//!
//! Every operator slot is optional and independent. A filter with no slot set
//! is empty and contributes nothing; every slot that is set becomes one
//! condition and all of them are ANDed. Contradicting slots (`equals=5` and
//! `greaterThan=10`) are not rejected, they simply match nothing.

use std::fmt;

use chrono::{DateTime, Utc};

use super::value::FilterValue;
use crate::domain::predicate::{Column, CompareOp, Condition};

/// Produces the conditions a filter contributes for one column
pub trait FilterConditions: fmt::Debug + Send + Sync {
    fn is_empty(&self) -> bool;

    fn conditions(&self, column: Column) -> Vec<Condition>;
}

/// Equality, set membership and null checks
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub in_list: Option<Vec<T>>,
    pub not_in_list: Option<Vec<T>>,
    /// `true` selects non-null rows, `false` selects null rows
    pub specified: Option<bool>,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_list: None,
            not_in_list: None,
            specified: None,
        }
    }
}

impl<T: FilterValue> Filter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equals(mut self, value: T) -> Self {
        self.equals = Some(value);
        self
    }

    pub fn with_not_equals(mut self, value: T) -> Self {
        self.not_equals = Some(value);
        self
    }

    pub fn with_in(mut self, values: Vec<T>) -> Self {
        self.in_list = Some(values);
        self
    }

    pub fn with_not_in(mut self, values: Vec<T>) -> Self {
        self.not_in_list = Some(values);
        self
    }

    pub fn with_specified(mut self, specified: bool) -> Self {
        self.specified = Some(specified);
        self
    }

    fn compare(column: Column, op: CompareOp, value: &T) -> Condition {
        Condition::Compare {
            column,
            op,
            value: value.to_sql(),
        }
    }
}

impl<T: FilterValue> FilterConditions for Filter<T> {
    fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not_equals.is_none()
            && self.in_list.is_none()
            && self.not_in_list.is_none()
            && self.specified.is_none()
    }

    fn conditions(&self, column: Column) -> Vec<Condition> {
        let mut out = Vec::new();
        if let Some(v) = &self.equals {
            out.push(Self::compare(column, CompareOp::Eq, v));
        }
        if let Some(v) = &self.not_equals {
            out.push(Self::compare(column, CompareOp::Ne, v));
        }
        if let Some(values) = &self.in_list {
            if values.is_empty() {
                out.push(Condition::Never);
            } else {
                out.push(Condition::In {
                    column,
                    values: values.iter().map(FilterValue::to_sql).collect(),
                    negated: false,
                });
            }
        }
        // an empty exclusion set excludes nothing
        if let Some(values) = self.not_in_list.as_ref().filter(|v| !v.is_empty()) {
            out.push(Condition::In {
                column,
                values: values.iter().map(FilterValue::to_sql).collect(),
                negated: true,
            });
        }
        if let Some(specified) = self.specified {
            out.push(Condition::Null {
                column,
                negated: specified,
            });
        }
        out
    }
}

/// [`Filter`] plus ordering comparisons
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    pub filter: Filter<T>,
    pub greater_than: Option<T>,
    pub less_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            greater_than: None,
            less_than: None,
            greater_than_or_equal: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: FilterValue> RangeFilter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equals(mut self, value: T) -> Self {
        self.filter.equals = Some(value);
        self
    }

    pub fn with_not_equals(mut self, value: T) -> Self {
        self.filter.not_equals = Some(value);
        self
    }

    pub fn with_in(mut self, values: Vec<T>) -> Self {
        self.filter.in_list = Some(values);
        self
    }

    pub fn with_not_in(mut self, values: Vec<T>) -> Self {
        self.filter.not_in_list = Some(values);
        self
    }

    pub fn with_specified(mut self, specified: bool) -> Self {
        self.filter.specified = Some(specified);
        self
    }

    pub fn with_greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    pub fn with_less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    pub fn with_greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    pub fn with_less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }
}

impl<T: FilterValue> FilterConditions for RangeFilter<T> {
    fn is_empty(&self) -> bool {
        self.filter.is_empty()
            && self.greater_than.is_none()
            && self.less_than.is_none()
            && self.greater_than_or_equal.is_none()
            && self.less_than_or_equal.is_none()
    }

    fn conditions(&self, column: Column) -> Vec<Condition> {
        let mut out = self.filter.conditions(column);
        let bounds = [
            (CompareOp::Gt, &self.greater_than),
            (CompareOp::Lt, &self.less_than),
            (CompareOp::Ge, &self.greater_than_or_equal),
            (CompareOp::Le, &self.less_than_or_equal),
        ];
        for (op, bound) in bounds {
            if let Some(v) = bound {
                out.push(Filter::compare(column, op, v));
            }
        }
        out
    }
}

/// [`Filter`] plus case-insensitive substring matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    pub filter: Filter<String>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equals(mut self, value: impl Into<String>) -> Self {
        self.filter.equals = Some(value.into());
        self
    }

    pub fn with_not_equals(mut self, value: impl Into<String>) -> Self {
        self.filter.not_equals = Some(value.into());
        self
    }

    pub fn with_in(mut self, values: Vec<String>) -> Self {
        self.filter.in_list = Some(values);
        self
    }

    pub fn with_specified(mut self, specified: bool) -> Self {
        self.filter.specified = Some(specified);
        self
    }

    pub fn with_contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    pub fn with_does_not_contain(mut self, value: impl Into<String>) -> Self {
        self.does_not_contain = Some(value.into());
        self
    }
}

impl FilterConditions for StringFilter {
    fn is_empty(&self) -> bool {
        self.filter.is_empty() && self.contains.is_none() && self.does_not_contain.is_none()
    }

    fn conditions(&self, column: Column) -> Vec<Condition> {
        let mut out = self.filter.conditions(column);
        if let Some(needle) = &self.contains {
            out.push(Condition::Like {
                column,
                needle: needle.clone(),
                negated: false,
            });
        }
        if let Some(needle) = &self.does_not_contain {
            out.push(Condition::Like {
                column,
                needle: needle.clone(),
                negated: true,
            });
        }
        out
    }
}

pub type LongFilter = RangeFilter<i64>;
pub type DoubleFilter = RangeFilter<f64>;
pub type InstantFilter = RangeFilter<DateTime<Utc>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::predicate::SqlValue;

    const COL: Column = Column::new("job", "min_salary");

    #[test]
    fn test_default_filters_are_empty() {
        assert!(LongFilter::new().is_empty());
        assert!(StringFilter::new().is_empty());
        assert!(InstantFilter::new().conditions(COL).is_empty());
    }

    #[test]
    fn test_every_set_slot_contributes() {
        let filter = LongFilter::new()
            .with_equals(5)
            .with_greater_than(10)
            .with_specified(true);
        let conditions = filter.conditions(COL);
        assert_eq!(conditions.len(), 3);
        assert!(conditions.contains(&Condition::Compare {
            column: COL,
            op: CompareOp::Gt,
            value: SqlValue::Integer(10),
        }));
    }

    #[test]
    fn test_specified_false_selects_nulls() {
        let conditions = LongFilter::new().with_specified(false).conditions(COL);
        assert_eq!(
            conditions,
            vec![Condition::Null {
                column: COL,
                negated: false
            }]
        );
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let conditions = LongFilter::new().with_in(vec![]).conditions(COL);
        assert_eq!(conditions, vec![Condition::Never]);
    }

    #[test]
    fn test_empty_not_in_matches_everything() {
        let filter = Filter::<i64>::new().with_not_in(vec![]);
        assert!(!filter.is_empty());
        assert!(filter.conditions(COL).is_empty());
    }

    #[test]
    fn test_string_contains_and_not_contains() {
        let filter = StringFilter::new()
            .with_contains("dev")
            .with_does_not_contain("ops");
        let conditions = filter.conditions(COL);
        assert_eq!(conditions.len(), 2);
        assert!(matches!(
            conditions[1],
            Condition::Like { negated: true, .. }
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = StringFilter::new().with_contains("Dev");
        let mut copy = original.clone();
        copy.contains = Some("Ops".to_string());
        assert_eq!(original.contains.as_deref(), Some("Dev"));
        assert_ne!(original, copy);
    }
}
