use crate::data::types::CountryRow;
use crate::domain::filter::{FilterKind, LongFilter, StringFilter};
use crate::domain::model::{EntityMeta, FieldDef, Relation, RelationKind};

pub static COUNTRY: EntityMeta = EntityMeta {
    name: "Country",
    table: "country",
    resource: "countries",
    fields: &[
        FieldDef::new("id", "id", FilterKind::Long),
        FieldDef::new("countryName", "country_name", FilterKind::String),
    ],
    relations: &[Relation {
        name: "region",
        filter: "regionId",
        target: "region",
        kind: RelationKind::ManyToOne {
            column: "region_id",
        },
    }],
};

criteria! {
    pub struct CountryCriteria for CountryRow {
        id: LongFilter = "id",
        country_name: StringFilter = "countryName",
        region_id: LongFilter = "regionId",
    }
}
