use crate::data::types::DepartmentRow;
use crate::domain::filter::{FilterKind, LongFilter, StringFilter};
use crate::domain::model::{EntityMeta, FieldDef, Relation, RelationKind};

pub static DEPARTMENT: EntityMeta = EntityMeta {
    name: "Department",
    table: "department",
    resource: "departments",
    fields: &[
        FieldDef::new("id", "id", FilterKind::Long),
        FieldDef::new("departmentName", "department_name", FilterKind::String),
    ],
    relations: &[
        Relation {
            name: "location",
            filter: "locationId",
            target: "location",
            kind: RelationKind::ManyToOne {
                column: "location_id",
            },
        },
        Relation {
            name: "employees",
            filter: "employeeId",
            target: "employee",
            kind: RelationKind::OneToMany {
                mapped_by: "department_id",
            },
        },
    ],
};

criteria! {
    pub struct DepartmentCriteria for DepartmentRow {
        id: LongFilter = "id",
        department_name: StringFilter = "departmentName",
        location_id: LongFilter = "locationId",
        employee_id: LongFilter = "employeeId",
    }
}
