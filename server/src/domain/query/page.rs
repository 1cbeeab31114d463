//! Paging and sorting
//!
//! Pages are 1-based. Sorting is restricted to the entity's scalar fields
//! and always ends with `id ASC` so that page boundaries are stable.

use crate::core::config::QueryConfig;
use crate::domain::criteria::CriteriaError;
use crate::domain::model::{EntityMeta, ID_COLUMN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort key on a root table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub size: u32,
    pub sorts: Vec<Sort>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
            sorts: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }

    /// `ORDER BY` body qualified with `root`, `id ASC` appended unless already sorted on id
    pub fn order_by_sql(&self, root: &str) -> String {
        let mut keys: Vec<String> = self
            .sorts
            .iter()
            .map(|s| format!("{}.{} {}", root, s.column, s.direction.as_sql()))
            .collect();
        if !self.sorts.iter().any(|s| s.column == ID_COLUMN) {
            keys.push(format!("{}.{} ASC", root, ID_COLUMN));
        }
        keys.join(", ")
    }

    /// Parse `page`, `size` and repeated `sort=field,asc|desc` parameters
    pub fn from_params(
        params: &[(String, String)],
        meta: &EntityMeta,
        config: &QueryConfig,
    ) -> Result<Self, CriteriaError> {
        let mut page = 1;
        let mut size = config.default_page_size;
        let mut sorts = Vec::new();

        for (key, value) in params {
            match key.as_str() {
                "page" => page = parse_positive("page", value)?,
                "size" => {
                    size = parse_positive("size", value)?;
                    if size > config.max_page_size {
                        return Err(CriteriaError::InvalidPaging(format!(
                            "size must be at most {}",
                            config.max_page_size
                        )));
                    }
                }
                "sort" => sorts.push(parse_sort(value, meta)?),
                _ => {}
            }
        }

        Ok(Self { page, size, sorts })
    }
}

fn parse_positive(name: &str, value: &str) -> Result<u32, CriteriaError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| {
            CriteriaError::InvalidPaging(format!("{} must be a positive integer, got '{}'", name, value))
        })
}

fn parse_sort(value: &str, meta: &EntityMeta) -> Result<Sort, CriteriaError> {
    let (field, direction) = match value.split_once(',') {
        Some((field, dir)) => (field.trim(), dir.trim()),
        None => (value.trim(), "asc"),
    };
    let direction = match direction.to_ascii_lowercase().as_str() {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        other => {
            return Err(CriteriaError::InvalidSort(format!(
                "unknown direction '{}' (expected asc or desc)",
                other
            )));
        }
    };
    let field = meta
        .field(field)
        .ok_or_else(|| CriteriaError::InvalidSort(format!("'{}' is not sortable", field)))?;
    Ok(Sort {
        column: field.column,
        direction,
    })
}

/// One page of results with total-count metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<E> Page<E> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.size.max(1)))
    }

    pub fn map<T>(self, f: impl FnMut(E) -> T) -> Page<T> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::job::JOB;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config() -> QueryConfig {
        QueryConfig {
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_defaults() {
        let request = PageRequest::from_params(&[], &JOB, &config()).unwrap();
        assert_eq!(request, PageRequest::new(1, 20));
        assert_eq!(request.offset(), 0);
        assert_eq!(request.order_by_sql("job"), "job.id ASC");
    }

    #[test]
    fn test_sort_and_tiebreaker() {
        let request = PageRequest::from_params(
            &params(&[
                ("page", "3"),
                ("size", "10"),
                ("sort", "jobTitle,desc"),
                ("sort", "minSalary"),
                ("jobTitle.contains", "x"),
            ]),
            &JOB,
            &config(),
        )
        .unwrap();
        assert_eq!(request.offset(), 20);
        assert_eq!(
            request.order_by_sql("job"),
            "job.job_title DESC, job.min_salary ASC, job.id ASC"
        );
    }

    #[test]
    fn test_page_zero_offset_is_first_page() {
        let request = PageRequest {
            page: 0,
            size: 10,
            sorts: Vec::new(),
        };
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_sort_on_id_has_no_duplicate_tiebreaker() {
        let request = PageRequest::new(1, 5).with_sort(Sort::desc("id"));
        assert_eq!(request.order_by_sql("job"), "job.id DESC");
    }

    #[test]
    fn test_invalid_paging() {
        for (key, value) in [("page", "0"), ("size", "abc"), ("size", "101")] {
            let err = PageRequest::from_params(&params(&[(key, value)]), &JOB, &config())
                .unwrap_err();
            assert_eq!(err.code(), "INVALID_PAGING", "{}={}", key, value);
        }
    }

    #[test]
    fn test_invalid_sort() {
        let err = PageRequest::from_params(&params(&[("sort", "taskId,asc")]), &JOB, &config())
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_SORT");
        let err = PageRequest::from_params(&params(&[("sort", "jobTitle,up")]), &JOB, &config())
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_SORT");
    }

    #[test]
    fn test_total_pages() {
        let page = Page {
            items: Vec::<()>::new(),
            page: 1,
            size: 10,
            total: 21,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
