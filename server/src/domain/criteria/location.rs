use crate::data::types::LocationRow;
use crate::domain::filter::{FilterKind, LongFilter, StringFilter};
use crate::domain::model::{EntityMeta, FieldDef, Relation, RelationKind};

pub static LOCATION: EntityMeta = EntityMeta {
    name: "Location",
    table: "location",
    resource: "locations",
    fields: &[
        FieldDef::new("id", "id", FilterKind::Long),
        FieldDef::new("streetAddress", "street_address", FilterKind::String),
        FieldDef::new("postalCode", "postal_code", FilterKind::String),
        FieldDef::new("city", "city", FilterKind::String),
        FieldDef::new("stateProvince", "state_province", FilterKind::String),
    ],
    relations: &[Relation {
        name: "country",
        filter: "countryId",
        target: "country",
        kind: RelationKind::ManyToOne {
            column: "country_id",
        },
    }],
};

criteria! {
    pub struct LocationCriteria for LocationRow {
        id: LongFilter = "id",
        street_address: StringFilter = "streetAddress",
        postal_code: StringFilter = "postalCode",
        city: StringFilter = "city",
        state_province: StringFilter = "stateProvince",
        country_id: LongFilter = "countryId",
    }
}
