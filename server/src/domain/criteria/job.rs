use crate::data::types::JobRow;
use crate::domain::filter::{FilterKind, LongFilter, StringFilter};
use crate::domain::model::{EntityMeta, FieldDef, Relation, RelationKind};

pub static JOB: EntityMeta = EntityMeta {
    name: "Job",
    table: "job",
    resource: "jobs",
    fields: &[
        FieldDef::new("id", "id", FilterKind::Long),
        FieldDef::new("jobTitle", "job_title", FilterKind::String),
        FieldDef::new("minSalary", "min_salary", FilterKind::Long),
        FieldDef::new("maxSalary", "max_salary", FilterKind::Long),
    ],
    relations: &[
        Relation {
            name: "tasks",
            filter: "taskId",
            target: "task",
            kind: RelationKind::ManyToMany {
                join_table: "job_task",
                source_column: "job_id",
                target_column: "task_id",
                owner: true,
            },
        },
        Relation {
            name: "employee",
            filter: "employeeId",
            target: "employee",
            kind: RelationKind::ManyToOne {
                column: "employee_id",
            },
        },
    ],
};

criteria! {
    pub struct JobCriteria for JobRow {
        id: LongFilter = "id",
        job_title: StringFilter = "jobTitle",
        min_salary: LongFilter = "minSalary",
        max_salary: LongFilter = "maxSalary",
        task_id: LongFilter = "taskId",
        employee_id: LongFilter = "employeeId",
    }
}
