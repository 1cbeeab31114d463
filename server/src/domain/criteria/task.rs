use crate::data::types::TaskRow;
use crate::domain::filter::{FilterKind, LongFilter, StringFilter};
use crate::domain::model::{EntityMeta, FieldDef, Relation, RelationKind};

pub static TASK: EntityMeta = EntityMeta {
    name: "Task",
    table: "task",
    resource: "tasks",
    fields: &[
        FieldDef::new("id", "id", FilterKind::Long),
        FieldDef::new("title", "title", FilterKind::String),
        FieldDef::new("description", "description", FilterKind::String),
    ],
    // inverse side, links are written by Job
    relations: &[Relation {
        name: "jobs",
        filter: "jobId",
        target: "job",
        kind: RelationKind::ManyToMany {
            join_table: "job_task",
            source_column: "task_id",
            target_column: "job_id",
            owner: false,
        },
    }],
};

criteria! {
    pub struct TaskCriteria for TaskRow {
        id: LongFilter = "id",
        title: StringFilter = "title",
        description: StringFilter = "description",
        job_id: LongFilter = "jobId",
    }
}
