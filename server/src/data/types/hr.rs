use serde::{Deserialize, Serialize};

use super::Entity;
use crate::domain::criteria::{country, department, employee, job, location, region, task};
use crate::domain::model::EntityMeta;

macro_rules! entity {
    ($row:ty, $meta:path) => {
        impl Entity for $row {
            const META: &'static EntityMeta = &$meta;

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: Option<i64>) {
                self.id = id;
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegionRow {
    pub id: Option<i64>,
    pub region_name: Option<String>,
}

entity!(RegionRow, region::REGION);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CountryRow {
    pub id: Option<i64>,
    pub country_name: Option<String>,
    pub region_id: Option<i64>,
}

entity!(CountryRow, country::COUNTRY);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocationRow {
    pub id: Option<i64>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country_id: Option<i64>,
}

entity!(LocationRow, location::LOCATION);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepartmentRow {
    pub id: Option<i64>,
    pub department_name: Option<String>,
    pub location_id: Option<i64>,
}

entity!(DepartmentRow, department::DEPARTMENT);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskRow {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

entity!(TaskRow, task::TASK);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// Epoch milliseconds
    pub hire_date: Option<i64>,
    pub salary: Option<i64>,
    pub commission_pct: Option<f64>,
    pub manager_id: Option<i64>,
    pub department_id: Option<i64>,
}

entity!(EmployeeRow, employee::EMPLOYEE);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobRow {
    pub id: Option<i64>,
    pub job_title: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub employee_id: Option<i64>,
    /// Linked tasks, stored in `job_task`
    #[sqlx(skip)]
    #[serde(default)]
    pub task_ids: Vec<i64>,
}

impl Entity for JobRow {
    const META: &'static EntityMeta = &job::JOB;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn linked_ids(&self, relation: &str) -> &[i64] {
        match relation {
            "tasks" => &self.task_ids,
            _ => &[],
        }
    }

    fn set_linked_ids(&mut self, relation: &str, ids: Vec<i64>) {
        if relation == "tasks" {
            self.task_ids = ids;
        }
    }
}
