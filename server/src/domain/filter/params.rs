//! Binding raw `field.operator=value` parameters onto filters

use std::fmt;

use super::types::{Filter, FilterConditions, RangeFilter, StringFilter};
use super::value::{FilterKind, FilterValue};

/// Operator suffix of a filter parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Specified,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    DoesNotContain,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Self::Equals,
        Self::NotEquals,
        Self::In,
        Self::NotIn,
        Self::Specified,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterThanOrEqual,
        Self::LessThanOrEqual,
        Self::Contains,
        Self::DoesNotContain,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Specified => "specified",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThanOrEqual => "lessThanOrEqual",
            Self::Contains => "contains",
            Self::DoesNotContain => "doesNotContain",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Operator not defined for this filter type
    Unsupported,
    /// Value did not parse as the field's type
    Invalid(String),
}

/// A concrete filter type that can be populated operator by operator
pub trait FilterOps: FilterConditions + Default + 'static {
    const KIND: FilterKind;

    fn apply(&mut self, op: Operator, raw: &str) -> Result<(), BindError>;
}

fn parse_one<T: FilterValue>(raw: &str) -> Result<T, BindError> {
    T::parse(raw).map_err(BindError::Invalid)
}

fn parse_list<T: FilterValue>(raw: &str) -> Result<Vec<T>, BindError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',').map(|item| parse_one(item.trim())).collect()
}

fn parse_bool(raw: &str) -> Result<bool, BindError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(BindError::Invalid(format!(
            "'{}' is not a boolean (expected true or false)",
            other
        ))),
    }
}

impl<T: FilterValue> Filter<T> {
    fn apply_base(&mut self, op: Operator, raw: &str) -> Result<(), BindError> {
        match op {
            Operator::Equals => self.equals = Some(parse_one(raw)?),
            Operator::NotEquals => self.not_equals = Some(parse_one(raw)?),
            Operator::In => self.in_list = Some(parse_list(raw)?),
            Operator::NotIn => self.not_in_list = Some(parse_list(raw)?),
            Operator::Specified => self.specified = Some(parse_bool(raw)?),
            _ => return Err(BindError::Unsupported),
        }
        Ok(())
    }
}

impl<T: FilterValue> FilterOps for RangeFilter<T> {
    const KIND: FilterKind = T::KIND;

    fn apply(&mut self, op: Operator, raw: &str) -> Result<(), BindError> {
        match op {
            Operator::GreaterThan => self.greater_than = Some(parse_one(raw)?),
            Operator::LessThan => self.less_than = Some(parse_one(raw)?),
            Operator::GreaterThanOrEqual => self.greater_than_or_equal = Some(parse_one(raw)?),
            Operator::LessThanOrEqual => self.less_than_or_equal = Some(parse_one(raw)?),
            _ => return self.filter.apply_base(op, raw),
        }
        Ok(())
    }
}

impl FilterOps for StringFilter {
    const KIND: FilterKind = FilterKind::String;

    fn apply(&mut self, op: Operator, raw: &str) -> Result<(), BindError> {
        match op {
            Operator::Contains => self.contains = Some(raw.to_string()),
            Operator::DoesNotContain => self.does_not_contain = Some(raw.to_string()),
            _ => return self.filter.apply_base(op, raw),
        }
        Ok(())
    }
}

/// Object-safe view of one optional filter slot in a criteria
pub trait FilterSlot: Send + Sync {
    fn kind(&self) -> FilterKind;

    /// The filter, if one is present
    fn filter(&self) -> Option<&dyn FilterConditions>;

    /// Set one operator, creating the filter if the slot is empty
    fn bind(&mut self, op: Operator, raw: &str) -> Result<(), BindError>;
}

impl<F: FilterOps> FilterSlot for Option<F> {
    fn kind(&self) -> FilterKind {
        F::KIND
    }

    fn filter(&self) -> Option<&dyn FilterConditions> {
        self.as_ref().map(|f| f as &dyn FilterConditions)
    }

    fn bind(&mut self, op: Operator, raw: &str) -> Result<(), BindError> {
        self.get_or_insert_with(F::default).apply(op, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{DoubleFilter, InstantFilter, LongFilter};

    #[test]
    fn test_operator_names_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_name(op.as_str()), Some(op));
        }
        assert_eq!(Operator::from_name("startsWith"), None);
    }

    #[test]
    fn test_long_slot_binds_range_and_set() {
        let mut slot: Option<LongFilter> = None;
        slot.bind(Operator::GreaterThan, "999").unwrap();
        slot.bind(Operator::In, "1, 2,3").unwrap();
        let filter = slot.unwrap();
        assert_eq!(filter.greater_than, Some(999));
        assert_eq!(filter.filter.in_list, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_contains_is_unsupported_on_numbers() {
        let mut slot: Option<DoubleFilter> = None;
        assert_eq!(
            slot.bind(Operator::Contains, "1"),
            Err(BindError::Unsupported)
        );
    }

    #[test]
    fn test_ordering_is_unsupported_on_strings() {
        let mut slot: Option<StringFilter> = None;
        assert_eq!(
            slot.bind(Operator::GreaterThan, "a"),
            Err(BindError::Unsupported)
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut slot: Option<LongFilter> = None;
        assert!(matches!(
            slot.bind(Operator::Equals, "ten"),
            Err(BindError::Invalid(_))
        ));
        assert!(matches!(
            slot.bind(Operator::Specified, "yes"),
            Err(BindError::Invalid(_))
        ));
        let mut instant: Option<InstantFilter> = None;
        assert!(instant.bind(Operator::LessThan, "2024-13-01").is_err());
    }

    #[test]
    fn test_empty_in_value_binds_empty_set() {
        let mut slot: Option<StringFilter> = None;
        slot.bind(Operator::In, "").unwrap();
        assert_eq!(slot.unwrap().filter.in_list, Some(vec![]));
    }

    #[test]
    fn test_list_items_are_trimmed() {
        let mut slot: Option<StringFilter> = None;
        slot.bind(Operator::In, "Developer, Tester ,Manager").unwrap();
        assert_eq!(
            slot.unwrap().filter.in_list,
            Some(vec![
                "Developer".to_string(),
                "Tester".to_string(),
                "Manager".to_string()
            ])
        );

        let mut ids: Option<LongFilter> = None;
        ids.bind(Operator::NotIn, "1, 2").unwrap();
        assert_eq!(ids.unwrap().filter.not_in_list, Some(vec![1, 2]));
    }

    #[test]
    fn test_slot_kind() {
        let slot: Option<StringFilter> = None;
        assert_eq!(slot.kind(), FilterKind::String);
        assert!(FilterSlot::filter(&slot).is_none());
    }
}
