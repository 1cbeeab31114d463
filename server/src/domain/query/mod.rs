//! Read-only query service
//!
//! Compiles a criteria once per call and hands the predicate to the
//! relational provider. `count(c)` always equals `list(c).len()` because
//! both run over the same predicate.

mod page;

pub use page::{Page, PageRequest, Sort, SortDirection};

use std::sync::Arc;

use crate::data::DataError;
use crate::data::traits::RelationalProvider;
use crate::data::types::Entity;
use crate::domain::criteria::Criteria;
use crate::domain::predicate::compile;

pub struct QueryService<C: Criteria> {
    provider: Arc<dyn RelationalProvider<C::Entity>>,
}

impl<C: Criteria> Clone for QueryService<C> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<C: Criteria> QueryService<C> {
    pub fn new(provider: Arc<dyn RelationalProvider<C::Entity>>) -> Self {
        Self { provider }
    }

    /// All rows matching the criteria, ordered by id
    pub async fn list(&self, criteria: Option<&C>) -> Result<Vec<C::Entity>, DataError> {
        tracing::debug!(entity = C::Entity::META.name, ?criteria, "find by criteria");
        let predicate = compile(criteria);
        self.provider.find_all(&predicate).await
    }

    /// One page of matching rows
    pub async fn list_paged(
        &self,
        criteria: Option<&C>,
        page: &PageRequest,
    ) -> Result<Page<C::Entity>, DataError> {
        tracing::debug!(
            entity = C::Entity::META.name,
            ?criteria,
            page = page.page,
            size = page.size,
            "find page by criteria"
        );
        let predicate = compile(criteria);
        self.provider.find_page(&predicate, page).await
    }

    pub async fn count(&self, criteria: Option<&C>) -> Result<u64, DataError> {
        tracing::debug!(entity = C::Entity::META.name, ?criteria, "count by criteria");
        let predicate = compile(criteria);
        self.provider.count(&predicate).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::data::sqlite::{SqliteRepository, SqliteService};
    use crate::data::traits::EntityRepository;
    use crate::data::types::{DepartmentRow, EmployeeRow, JobRow, TaskRow};
    use crate::domain::criteria::{DepartmentCriteria, EmployeeCriteria, JobCriteria};
    use crate::domain::filter::{InstantFilter, LongFilter, StringFilter};

    struct Fixture {
        jobs: QueryService<JobCriteria>,
        employees: QueryService<EmployeeCriteria>,
        departments: QueryService<DepartmentCriteria>,
        job_repo: Arc<SqliteRepository<JobRow>>,
        developer: i64,
        alice: i64,
        bob: i64,
        sales: i64,
        design: i64,
        review: i64,
    }

    async fn fixture() -> Fixture {
        let db = SqliteService::in_memory().await.unwrap();
        let pool = db.pool().clone();
        let task_repo = SqliteRepository::<TaskRow>::new(pool.clone());
        let dept_repo = SqliteRepository::<DepartmentRow>::new(pool.clone());
        let emp_repo = Arc::new(SqliteRepository::<EmployeeRow>::new(pool.clone()));
        let job_repo = Arc::new(SqliteRepository::<JobRow>::new(pool.clone()));

        let design = task_repo
            .insert(&TaskRow {
                title: Some("Design".into()),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
            .unwrap();
        let review = task_repo
            .insert(&TaskRow {
                title: Some("Review".into()),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
            .unwrap();
        let sales = dept_repo
            .insert(&DepartmentRow {
                department_name: Some("Sales".into()),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
            .unwrap();

        let alice = emp_repo
            .insert(&EmployeeRow {
                first_name: Some("Alice".into()),
                hire_date: Some(
                    Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0)
                        .unwrap()
                        .timestamp_millis(),
                ),
                salary: Some(4000),
                department_id: Some(sales),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
            .unwrap();
        let bob = emp_repo
            .insert(&EmployeeRow {
                first_name: Some("Bob".into()),
                salary: Some(3000),
                manager_id: Some(alice),
                department_id: Some(sales),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
            .unwrap();
        emp_repo
            .insert(&EmployeeRow {
                first_name: Some("Carol".into()),
                manager_id: Some(alice),
                ..Default::default()
            })
            .await
            .unwrap();

        let developer = job_repo
            .insert(&JobRow {
                job_title: Some("Developer".into()),
                min_salary: Some(1000),
                max_salary: Some(5000),
                employee_id: Some(alice),
                task_ids: vec![design, review],
                ..Default::default()
            })
            .await
            .unwrap()
            .id
            .unwrap();
        job_repo
            .insert(&JobRow {
                job_title: Some("Tester".into()),
                min_salary: Some(800),
                employee_id: Some(bob),
                task_ids: vec![review],
                ..Default::default()
            })
            .await
            .unwrap();
        job_repo
            .insert(&JobRow {
                job_title: Some("Manager".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        Fixture {
            jobs: QueryService::new(job_repo.clone()),
            employees: QueryService::new(emp_repo),
            departments: QueryService::new(Arc::new(dept_repo)),
            job_repo,
            developer,
            alice,
            bob,
            sales,
            design,
            review,
        }
    }

    fn titles(jobs: &[JobRow]) -> Vec<&str> {
        jobs.iter().filter_map(|j| j.job_title.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_empty_criteria_returns_every_row() {
        let f = fixture().await;
        let all = f.jobs.list(None).await.unwrap();
        assert_eq!(titles(&all), vec!["Developer", "Tester", "Manager"]);
        assert_eq!(f.jobs.list(Some(&JobCriteria::default())).await.unwrap(), all);
        assert_eq!(f.jobs.count(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_job_title_and_salary_scenario() {
        let f = fixture().await;
        let contains = JobCriteria {
            job_title: Some(StringFilter::new().with_contains("Dev")),
            ..Default::default()
        };
        assert_eq!(titles(&f.jobs.list(Some(&contains)).await.unwrap()), vec!["Developer"]);

        let below = JobCriteria {
            id: Some(LongFilter::new().with_equals(f.developer)),
            min_salary: Some(LongFilter::new().with_less_than(1000)),
            ..Default::default()
        };
        assert!(f.jobs.list(Some(&below)).await.unwrap().is_empty());

        let above = JobCriteria {
            id: Some(LongFilter::new().with_equals(f.developer)),
            min_salary: Some(LongFilter::new().with_greater_than(999)),
            ..Default::default()
        };
        assert_eq!(f.jobs.count(Some(&above)).await.unwrap(), 1);

        let before = f.jobs.count(None).await.unwrap();
        assert!(f.job_repo.delete(f.developer).await.unwrap());
        assert_eq!(f.jobs.count(None).await.unwrap(), before - 1);
    }

    #[tokio::test]
    async fn test_equals_and_not_equals_split_non_null_rows() {
        let f = fixture().await;
        let equals = EmployeeCriteria {
            salary: Some(LongFilter::new().with_equals(4000)),
            ..Default::default()
        };
        let not_equals = EmployeeCriteria {
            salary: Some(LongFilter::new().with_not_equals(4000)),
            ..Default::default()
        };
        let eq = f.employees.list(Some(&equals)).await.unwrap();
        let ne = f.employees.list(Some(&not_equals)).await.unwrap();
        assert_eq!(eq.len(), 1);
        assert_eq!(eq[0].id, Some(f.alice));
        // Carol has no salary and matches neither side
        assert_eq!(ne.len(), 1);
        assert_eq!(ne[0].id, Some(f.bob));
    }

    #[tokio::test]
    async fn test_specified_partitions_the_table() {
        let f = fixture().await;
        let total = f.employees.count(None).await.unwrap();
        let with_manager = EmployeeCriteria {
            manager_id: Some(LongFilter::new().with_specified(true)),
            ..Default::default()
        };
        let without_manager = EmployeeCriteria {
            manager_id: Some(LongFilter::new().with_specified(false)),
            ..Default::default()
        };
        let a = f.employees.count(Some(&with_manager)).await.unwrap();
        let b = f.employees.count(Some(&without_manager)).await.unwrap();
        assert_eq!(a, 2);
        assert_eq!(b, 1);
        assert_eq!(a + b, total);
    }

    #[tokio::test]
    async fn test_two_relation_filters_on_many_to_many() {
        let f = fixture().await;
        let by_design = JobCriteria {
            task_id: Some(LongFilter::new().with_equals(f.design)),
            ..Default::default()
        };
        let by_review = JobCriteria {
            task_id: Some(LongFilter::new().with_equals(f.review)),
            ..Default::default()
        };
        assert_eq!(titles(&f.jobs.list(Some(&by_design)).await.unwrap()), vec!["Developer"]);
        assert_eq!(
            titles(&f.jobs.list(Some(&by_review)).await.unwrap()),
            vec!["Developer", "Tester"]
        );

        let both = JobCriteria {
            task_id: Some(LongFilter::new().with_in(vec![f.design, f.review])),
            employee_id: Some(LongFilter::new().with_equals(f.alice)),
            ..Default::default()
        };
        let found = f.jobs.list(Some(&both)).await.unwrap();
        assert_eq!(titles(&found), vec!["Developer"]);
        assert_eq!(found[0].task_ids, vec![f.design, f.review]);
        assert_eq!(f.jobs.count(Some(&both)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_one_to_many_relation_filters_compose() {
        let f = fixture().await;
        let by_alice = DepartmentCriteria {
            employee_id: Some(LongFilter::new().with_equals(f.alice)),
            ..Default::default()
        };
        let by_bob = DepartmentCriteria {
            employee_id: Some(LongFilter::new().with_equals(f.bob)),
            ..Default::default()
        };
        let either = DepartmentCriteria {
            employee_id: Some(LongFilter::new().with_in(vec![f.alice, f.bob])),
            department_name: Some(StringFilter::new().with_equals("Sales")),
            ..Default::default()
        };
        for criteria in [&by_alice, &by_bob, &either] {
            let found = f.departments.list(Some(criteria)).await.unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].id, Some(f.sales));
            assert_eq!(f.departments.count(Some(criteria)).await.unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn test_contains_matches_non_ascii_substrings() {
        let f = fixture().await;
        f.job_repo
            .insert(&JobRow {
                job_title: Some("Café manager".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let criteria = |filter: StringFilter| JobCriteria {
            job_title: Some(filter),
            ..Default::default()
        };
        let contains = criteria(StringFilter::new().with_contains("é"));
        assert_eq!(
            titles(&f.jobs.list(Some(&contains)).await.unwrap()),
            vec!["Café manager"]
        );
        let mixed_case = criteria(StringFilter::new().with_contains("CAFé"));
        assert_eq!(f.jobs.count(Some(&mixed_case)).await.unwrap(), 1);

        let excluded = criteria(StringFilter::new().with_does_not_contain("é"));
        assert_eq!(
            titles(&f.jobs.list(Some(&excluded)).await.unwrap()),
            vec!["Developer", "Tester", "Manager"]
        );
    }

    #[tokio::test]
    async fn test_count_matches_list_length() {
        let f = fixture().await;
        let cases = [
            EmployeeCriteria::default(),
            EmployeeCriteria {
                department_id: Some(LongFilter::new().with_equals(f.sales)),
                ..Default::default()
            },
            EmployeeCriteria {
                manager_id: Some(LongFilter::new().with_in(vec![])),
                ..Default::default()
            },
            EmployeeCriteria {
                hire_date: Some(InstantFilter::new().with_less_than(Utc::now())),
                first_name: Some(StringFilter::new().with_does_not_contain("bo")),
                ..Default::default()
            },
            EmployeeCriteria {
                job_id: Some(LongFilter::new().with_specified(true)),
                ..Default::default()
            },
        ];
        for criteria in &cases {
            let listed = f.employees.list(Some(criteria)).await.unwrap();
            let counted = f.employees.count(Some(criteria)).await.unwrap();
            assert_eq!(counted, listed.len() as u64, "{:?}", criteria);
        }
    }

    #[tokio::test]
    async fn test_paging_is_stable_and_counts_total() {
        let f = fixture().await;
        let request = PageRequest::new(1, 2).with_sort(Sort::desc("job_title"));
        let first = f.jobs.list_paged(None, &request).await.unwrap();
        assert_eq!(titles(&first.items), vec!["Tester", "Manager"]);
        assert_eq!(first.total, 3);
        assert_eq!(first.total_pages(), 2);

        let second = f
            .jobs
            .list_paged(None, &PageRequest { page: 2, ..request })
            .await
            .unwrap();
        assert_eq!(titles(&second.items), vec!["Developer"]);

        let everything = f
            .jobs
            .list_paged(None, &PageRequest::new(1, 100))
            .await
            .unwrap();
        assert_eq!(everything.items, f.jobs.list(None).await.unwrap());
    }
}
