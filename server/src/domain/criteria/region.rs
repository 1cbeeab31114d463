use crate::data::types::RegionRow;
use crate::domain::filter::{FilterKind, LongFilter, StringFilter};
use crate::domain::model::{EntityMeta, FieldDef};

pub static REGION: EntityMeta = EntityMeta {
    name: "Region",
    table: "region",
    resource: "regions",
    fields: &[
        FieldDef::new("id", "id", FilterKind::Long),
        FieldDef::new("regionName", "region_name", FilterKind::String),
    ],
    relations: &[],
};

criteria! {
    /// Filters for regions
    pub struct RegionCriteria for RegionRow {
        id: LongFilter = "id",
        region_name: StringFilter = "regionName",
    }
}
