use crate::data::types::EmployeeRow;
use crate::domain::filter::{DoubleFilter, FilterKind, InstantFilter, LongFilter, StringFilter};
use crate::domain::model::{EntityMeta, FieldDef, Relation, RelationKind};

pub static EMPLOYEE: EntityMeta = EntityMeta {
    name: "Employee",
    table: "employee",
    resource: "employees",
    fields: &[
        FieldDef::new("id", "id", FilterKind::Long),
        FieldDef::new("firstName", "first_name", FilterKind::String),
        FieldDef::new("lastName", "last_name", FilterKind::String),
        FieldDef::new("email", "email", FilterKind::String),
        FieldDef::new("phoneNumber", "phone_number", FilterKind::String),
        FieldDef::new("hireDate", "hire_date", FilterKind::Instant),
        FieldDef::new("salary", "salary", FilterKind::Long),
        FieldDef::new("commissionPct", "commission_pct", FilterKind::Double),
    ],
    relations: &[
        Relation {
            name: "jobs",
            filter: "jobId",
            target: "job",
            kind: RelationKind::OneToMany {
                mapped_by: "employee_id",
            },
        },
        Relation {
            name: "manager",
            filter: "managerId",
            target: "employee",
            kind: RelationKind::ManyToOne {
                column: "manager_id",
            },
        },
        Relation {
            name: "department",
            filter: "departmentId",
            target: "department",
            kind: RelationKind::ManyToOne {
                column: "department_id",
            },
        },
    ],
};

criteria! {
    /// Filters for employees, including the self-referencing manager relation
    pub struct EmployeeCriteria for EmployeeRow {
        id: LongFilter = "id",
        first_name: StringFilter = "firstName",
        last_name: StringFilter = "lastName",
        email: StringFilter = "email",
        phone_number: StringFilter = "phoneNumber",
        hire_date: InstantFilter = "hireDate",
        salary: LongFilter = "salary",
        commission_pct: DoubleFilter = "commissionPct",
        job_id: LongFilter = "jobId",
        manager_id: LongFilter = "managerId",
        department_id: LongFilter = "departmentId",
    }
}
