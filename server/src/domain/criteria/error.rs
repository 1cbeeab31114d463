//! Criteria binding errors

use thiserror::Error;

use crate::domain::filter::{FilterKind, Operator};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriteriaError {
    #[error("Unknown filter field '{field}' for {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Unknown filter operator '{operator}' on '{field}'")]
    UnknownOperator { field: String, operator: String },

    #[error("Operator '{operator}' is not supported for {kind} field '{field}'")]
    UnsupportedOperator {
        field: String,
        operator: Operator,
        kind: FilterKind,
    },

    #[error("Invalid value for '{field}.{operator}': {reason}")]
    InvalidValue {
        field: String,
        operator: Operator,
        reason: String,
    },

    #[error("Too many values for '{field}' (max {max})")]
    TooManyValues { field: String, max: usize },

    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    #[error("Invalid paging parameter: {0}")]
    InvalidPaging(String),

    #[error("Invalid criteria declaration for {entity}: {reason}")]
    Declaration {
        entity: &'static str,
        reason: String,
    },
}

impl CriteriaError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownField { .. } => "INVALID_FILTER_FIELD",
            Self::UnknownOperator { .. } | Self::UnsupportedOperator { .. } => {
                "INVALID_FILTER_OPERATOR"
            }
            Self::InvalidValue { .. } => "INVALID_FILTER_VALUE",
            Self::TooManyValues { .. } => "TOO_MANY_FILTER_VALUES",
            Self::InvalidSort(_) => "INVALID_SORT",
            Self::InvalidPaging(_) => "INVALID_PAGING",
            Self::Declaration { .. } => "INVALID_CRITERIA_DECLARATION",
        }
    }
}
