//! Predicate building blocks
//!
//! A [`Predicate`] is an ordered list of outer joins plus an ordered
//! conjunction of [`Condition`]s over one root table. Rendering produces SQL
//! fragments with `?` placeholders and pushes the bind values into
//! [`SqlParams`] in placeholder order.

use std::fmt;

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    fn push(&mut self, value: SqlValue) -> &'static str {
        self.values.push(value);
        "?"
    }
}

/// Qualified column reference (`alias.column`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub qualifier: &'static str,
    pub name: &'static str,
}

impl Column {
    pub const fn new(qualifier: &'static str, name: &'static str) -> Self {
        Self { qualifier, name }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qualifier, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

/// A single boolean condition on one column
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: Column,
        op: CompareOp,
        value: SqlValue,
    },
    In {
        column: Column,
        values: Vec<SqlValue>,
        negated: bool,
    },
    Null {
        column: Column,
        negated: bool,
    },
    /// Case-insensitive substring match
    Like {
        column: Column,
        needle: String,
        negated: bool,
    },
    /// Matches no row (e.g. `IN` over an empty set)
    Never,
}

impl Condition {
    /// Generate SQL WHERE clause fragment
    /// Returns the SQL clause with ? placeholders and updates params
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            Self::Compare { column, op, value } => {
                format!("{} {} {}", column, op.as_sql(), params.push(value.clone()))
            }
            Self::In {
                column,
                values,
                negated,
            } => {
                let placeholders: Vec<&str> =
                    values.iter().map(|v| params.push(v.clone())).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", column, keyword, placeholders.join(", "))
            }
            Self::Null { column, negated } => {
                if *negated {
                    format!("{} IS NOT NULL", column)
                } else {
                    format!("{} IS NULL", column)
                }
            }
            Self::Like {
                column,
                needle,
                negated,
            } => {
                // Both sides fold in SQLite so non-ASCII text compares byte for byte
                let pattern = format!("%{}%", escape_like(needle));
                let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
                format!(
                    "UPPER({}) {} UPPER({}) ESCAPE '\\'",
                    column,
                    keyword,
                    params.push(SqlValue::Text(pattern))
                )
            }
            Self::Never => "1 = 0".to_string(),
        }
    }
}

/// Escape `%`, `_` and `\\` so user input matches literally under `ESCAPE '\\'`
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `LEFT JOIN table AS alias ON alias.left = root.right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: &'static str,
    pub alias: &'static str,
    pub on: (Column, Column),
    /// The join can multiply root rows
    pub to_many: bool,
}

impl Join {
    pub fn to_sql(&self) -> String {
        format!(
            "LEFT JOIN {} AS {} ON {} = {}",
            self.table, self.alias, self.on.0, self.on.1
        )
    }
}

/// Compiled query condition over one root table.
///
/// Composition never mutates in place: [`Predicate::and`] and
/// [`Predicate::join`] consume the accumulator and return the composed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    root: &'static str,
    joins: Vec<Join>,
    conditions: Vec<Condition>,
}

impl Predicate {
    /// The identity predicate: matches every row of `root`
    pub fn all(root: &'static str) -> Self {
        Self {
            root,
            joins: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn and(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        if !self.joins.iter().any(|j| j.alias == join.alias) {
            self.joins.push(join);
        }
        self
    }

    pub fn root(&self) -> &'static str {
        self.root
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_identity(&self) -> bool {
        self.joins.is_empty() && self.conditions.is_empty()
    }

    /// True when a to-many join is present and rows must be de-duplicated
    pub fn requires_distinct(&self) -> bool {
        self.joins.iter().any(|j| j.to_many)
    }

    /// `root LEFT JOIN ...` (without the `FROM` keyword)
    pub fn from_sql(&self) -> String {
        let mut sql = self.root.to_string();
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }
        sql
    }

    /// Conjunction of all conditions, `1 = 1` for the identity predicate
    pub fn where_sql(&self, params: &mut SqlParams) -> String {
        if self.conditions.is_empty() {
            return "1 = 1".to_string();
        }
        self.conditions
            .iter()
            .map(|c| c.to_sql(params))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: Column = Column::new("job", "job_title");

    #[test]
    fn test_compare_renders_placeholder() {
        let mut params = SqlParams::default();
        let cond = Condition::Compare {
            column: Column::new("job", "min_salary"),
            op: CompareOp::Ge,
            value: SqlValue::Integer(10),
        };
        assert_eq!(cond.to_sql(&mut params), "job.min_salary >= ?");
        assert_eq!(params.values, vec![SqlValue::Integer(10)]);
    }

    #[test]
    fn test_in_and_not_in() {
        let mut params = SqlParams::default();
        let cond = Condition::In {
            column: NAME,
            values: vec![SqlValue::Text("a".into()), SqlValue::Text("b".into())],
            negated: true,
        };
        assert_eq!(cond.to_sql(&mut params), "job.job_title NOT IN (?, ?)");
        assert_eq!(params.values.len(), 2);
    }

    #[test]
    fn test_like_is_case_insensitive_and_escaped() {
        let mut params = SqlParams::default();
        let cond = Condition::Like {
            column: NAME,
            needle: "50%_dev".into(),
            negated: false,
        };
        assert_eq!(
            cond.to_sql(&mut params),
            "UPPER(job.job_title) LIKE UPPER(?) ESCAPE '\\'"
        );
        assert_eq!(
            params.values,
            vec![SqlValue::Text("%50\\%\\_dev%".to_string())]
        );
    }

    #[test]
    fn test_like_binds_non_ascii_needle_unchanged() {
        let mut params = SqlParams::default();
        let cond = Condition::Like {
            column: NAME,
            needle: "straße é".into(),
            negated: true,
        };
        assert_eq!(
            cond.to_sql(&mut params),
            "UPPER(job.job_title) NOT LIKE UPPER(?) ESCAPE '\\'"
        );
        assert_eq!(
            params.values,
            vec![SqlValue::Text("%straße é%".to_string())]
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("100%_"), "100\\%\\_");
    }

    #[test]
    fn test_null_checks() {
        let mut params = SqlParams::default();
        let is_null = Condition::Null {
            column: NAME,
            negated: false,
        };
        let not_null = Condition::Null {
            column: NAME,
            negated: true,
        };
        assert_eq!(is_null.to_sql(&mut params), "job.job_title IS NULL");
        assert_eq!(not_null.to_sql(&mut params), "job.job_title IS NOT NULL");
        assert!(params.values.is_empty());
    }

    #[test]
    fn test_identity_predicate() {
        let predicate = Predicate::all("job");
        let mut params = SqlParams::default();
        assert!(predicate.is_identity());
        assert_eq!(predicate.from_sql(), "job");
        assert_eq!(predicate.where_sql(&mut params), "1 = 1");
    }

    #[test]
    fn test_and_accumulates_in_order() {
        let predicate = Predicate::all("job")
            .and([Condition::Null {
                column: NAME,
                negated: true,
            }])
            .and([Condition::Never]);
        let mut params = SqlParams::default();
        assert_eq!(
            predicate.where_sql(&mut params),
            "job.job_title IS NOT NULL AND 1 = 0"
        );
    }

    #[test]
    fn test_join_rendering_and_distinct() {
        let join = Join {
            table: "job_task",
            alias: "tasks",
            on: (Column::new("tasks", "job_id"), Column::new("job", "id")),
            to_many: true,
        };
        let predicate = Predicate::all("job").join(join.clone()).join(join);
        assert_eq!(predicate.joins().len(), 1);
        assert!(predicate.requires_distinct());
        assert_eq!(
            predicate.from_sql(),
            "job LEFT JOIN job_task AS tasks ON tasks.job_id = job.id"
        );
    }
}
