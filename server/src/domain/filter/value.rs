use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::predicate::SqlValue;

/// Semantic type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Long,
    Double,
    String,
    Instant,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Instant => "instant",
        };
        write!(f, "{}", s)
    }
}

/// A value a filter can compare against
pub trait FilterValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: FilterKind;

    /// Parse a raw query parameter value
    fn parse(raw: &str) -> Result<Self, String>;

    fn to_sql(&self) -> SqlValue;
}

impl FilterValue for i64 {
    const KIND: FilterKind = FilterKind::Long;

    fn parse(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid integer", raw))
    }

    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(*self)
    }
}

impl FilterValue for f64 {
    const KIND: FilterKind = FilterKind::Double;

    fn parse(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("'{}' is not a valid number", raw))
    }

    fn to_sql(&self) -> SqlValue {
        SqlValue::Real(*self)
    }
}

impl FilterValue for String {
    const KIND: FilterKind = FilterKind::String;

    fn parse(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn to_sql(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

/// Instants are stored as milliseconds since the Unix epoch
impl FilterValue for DateTime<Utc> {
    const KIND: FilterKind = FilterKind::Instant;

    fn parse(raw: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| format!("'{}' is not an RFC 3339 timestamp", raw))
    }

    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(self.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long() {
        assert_eq!(i64::parse(" 42 "), Ok(42));
        assert!(i64::parse("4.2").is_err());
        assert!(i64::parse("abc").is_err());
    }

    #[test]
    fn test_parse_double_rejects_non_finite() {
        assert_eq!(f64::parse("0.25"), Ok(0.25));
        assert!(f64::parse("NaN").is_err());
        assert!(f64::parse("inf").is_err());
    }

    #[test]
    fn test_instant_binds_as_millis() {
        let dt = DateTime::<Utc>::parse("2024-01-02T03:04:05Z").unwrap();
        assert_eq!(dt.to_sql(), SqlValue::Integer(1_704_164_645_000));
        assert!(DateTime::<Utc>::parse("yesterday").is_err());
    }

    #[test]
    fn test_string_keeps_raw_value() {
        assert_eq!(String::parse(" a b "), Ok(" a b ".to_string()));
    }
}
