//! Resource DTOs
//!
//! Wire shapes of the HR entities: camelCase names, relations as `<name>Id`
//! fields and instants as RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{
    CountryRow, DepartmentRow, EmployeeRow, JobRow, LocationRow, RegionRow, TaskRow,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionDto {
    pub id: Option<i64>,
    pub region_name: Option<String>,
}

impl From<RegionRow> for RegionDto {
    fn from(row: RegionRow) -> Self {
        Self {
            id: row.id,
            region_name: row.region_name,
        }
    }
}

impl From<RegionDto> for RegionRow {
    fn from(dto: RegionDto) -> Self {
        Self {
            id: dto.id,
            region_name: dto.region_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryDto {
    pub id: Option<i64>,
    pub country_name: Option<String>,
    pub region_id: Option<i64>,
}

impl From<CountryRow> for CountryDto {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            country_name: row.country_name,
            region_id: row.region_id,
        }
    }
}

impl From<CountryDto> for CountryRow {
    fn from(dto: CountryDto) -> Self {
        Self {
            id: dto.id,
            country_name: dto.country_name,
            region_id: dto.region_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub id: Option<i64>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country_id: Option<i64>,
}

impl From<LocationRow> for LocationDto {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            street_address: row.street_address,
            postal_code: row.postal_code,
            city: row.city,
            state_province: row.state_province,
            country_id: row.country_id,
        }
    }
}

impl From<LocationDto> for LocationRow {
    fn from(dto: LocationDto) -> Self {
        Self {
            id: dto.id,
            street_address: dto.street_address,
            postal_code: dto.postal_code,
            city: dto.city,
            state_province: dto.state_province,
            country_id: dto.country_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: Option<i64>,
    #[validate(required(message = "departmentName is required"))]
    pub department_name: Option<String>,
    pub location_id: Option<i64>,
}

impl From<DepartmentRow> for DepartmentDto {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id,
            department_name: row.department_name,
            location_id: row.location_id,
        }
    }
}

impl From<DepartmentDto> for DepartmentRow {
    fn from(dto: DepartmentDto) -> Self {
        Self {
            id: dto.id,
            department_name: dto.department_name,
            location_id: dto.location_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<TaskRow> for TaskDto {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
        }
    }
}

impl From<TaskDto> for TaskRow {
    fn from(dto: TaskDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            description: dto.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub hire_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "salary must not be negative"))]
    pub salary: Option<i64>,
    #[validate(range(min = 0.0, message = "commissionPct must not be negative"))]
    pub commission_pct: Option<f64>,
    pub manager_id: Option<i64>,
    pub department_id: Option<i64>,
}

impl From<EmployeeRow> for EmployeeDto {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            hire_date: row.hire_date.and_then(DateTime::from_timestamp_millis),
            salary: row.salary,
            commission_pct: row.commission_pct,
            manager_id: row.manager_id,
            department_id: row.department_id,
        }
    }
}

impl From<EmployeeDto> for EmployeeRow {
    fn from(dto: EmployeeDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            phone_number: dto.phone_number,
            hire_date: dto.hire_date.map(|d| d.timestamp_millis()),
            salary: dto.salary,
            commission_pct: dto.commission_pct,
            manager_id: dto.manager_id,
            department_id: dto.department_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub id: Option<i64>,
    pub job_title: Option<String>,
    #[validate(range(min = 0, message = "minSalary must not be negative"))]
    pub min_salary: Option<i64>,
    #[validate(range(min = 0, message = "maxSalary must not be negative"))]
    pub max_salary: Option<i64>,
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub task_ids: Vec<i64>,
}

impl From<JobRow> for JobDto {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            job_title: row.job_title,
            min_salary: row.min_salary,
            max_salary: row.max_salary,
            employee_id: row.employee_id,
            task_ids: row.task_ids,
        }
    }
}

impl From<JobDto> for JobRow {
    fn from(dto: JobDto) -> Self {
        Self {
            id: dto.id,
            job_title: dto.job_title,
            min_salary: dto.min_salary,
            max_salary: dto.max_salary,
            employee_id: dto.employee_id,
            task_ids: dto.task_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_hire_date_is_rfc3339_on_the_wire() {
        let row = EmployeeRow {
            id: Some(1),
            hire_date: Some(1_577_836_800_000),
            ..Default::default()
        };
        let json = serde_json::to_value(EmployeeDto::from(row.clone())).unwrap();
        assert_eq!(json["hireDate"], "2020-01-01T00:00:00Z");

        let back: EmployeeDto = serde_json::from_value(json).unwrap();
        assert_eq!(EmployeeRow::from(back), row);
    }

    #[test]
    fn test_job_task_ids_default_to_empty() {
        let dto: JobDto = serde_json::from_str(r#"{"jobTitle":"Developer"}"#).unwrap();
        assert!(dto.task_ids.is_empty());
        assert_eq!(dto.job_title.as_deref(), Some("Developer"));
    }

    #[test]
    fn test_validation_rules() {
        assert!(DepartmentDto::default().validate().is_err());
        let employee = EmployeeDto {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(employee.validate().is_err());
        let job = JobDto {
            min_salary: Some(-1),
            ..Default::default()
        };
        assert!(job.validate().is_err());
        assert!(JobDto::default().validate().is_ok());
    }
}
