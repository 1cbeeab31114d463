//! Closed, declarative entity descriptions
//!
//! Every entity declares its filterable fields and relations once, as static
//! data. The compiler, the SQLite provider and the search mirror all read the
//! same table, so the API name of a field, its column and its filter type can
//! never drift apart. Declarations are checked against the matching criteria
//! type at startup (see [`crate::domain::criteria::validate`]).

use super::filter::FilterKind;
use super::predicate::{Column, Join};

/// Primary key column shared by every entity table
pub const ID_COLUMN: &str = "id";

/// One scalar field: API name, column and filter type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FilterKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, column: &'static str, kind: FilterKind) -> Self {
        Self { name, column, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Foreign key column on the root table
    ManyToOne { column: &'static str },
    /// Foreign key column on the target table pointing back at the root
    OneToMany { mapped_by: &'static str },
    /// Link table; `owner` marks the side that writes the links
    ManyToMany {
        join_table: &'static str,
        source_column: &'static str,
        target_column: &'static str,
        owner: bool,
    },
}

/// A relation addressed by a filter on the related entity's identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Relation name, also used as the join alias
    pub name: &'static str,
    /// API filter name (e.g. `departmentId`)
    pub filter: &'static str,
    pub target: &'static str,
    pub kind: RelationKind,
}

impl Relation {
    /// Outer join for this relation and the column holding the related id
    pub fn resolve(&self, root: &'static str) -> (Join, Column) {
        let alias = self.name;
        match self.kind {
            RelationKind::ManyToOne { column } => (
                Join {
                    table: self.target,
                    alias,
                    on: (Column::new(alias, ID_COLUMN), Column::new(root, column)),
                    to_many: false,
                },
                Column::new(alias, ID_COLUMN),
            ),
            RelationKind::OneToMany { mapped_by } => (
                Join {
                    table: self.target,
                    alias,
                    on: (Column::new(alias, mapped_by), Column::new(root, ID_COLUMN)),
                    to_many: true,
                },
                Column::new(alias, ID_COLUMN),
            ),
            RelationKind::ManyToMany {
                join_table,
                source_column,
                target_column,
                ..
            } => (
                Join {
                    table: join_table,
                    alias,
                    on: (
                        Column::new(alias, source_column),
                        Column::new(root, ID_COLUMN),
                    ),
                    to_many: true,
                },
                Column::new(alias, target_column),
            ),
        }
    }

    /// Link table written by the root entity, if any
    pub fn owned_link(&self) -> Option<(&'static str, &'static str, &'static str)> {
        match self.kind {
            RelationKind::ManyToMany {
                join_table,
                source_column,
                target_column,
                owner: true,
            } => Some((join_table, source_column, target_column)),
            _ => None,
        }
    }
}

/// Static description of one entity
#[derive(Debug)]
pub struct EntityMeta {
    /// Display name (`Job`)
    pub name: &'static str,
    pub table: &'static str,
    /// URL segment and search index name (`jobs`)
    pub resource: &'static str,
    /// Scalar fields in compile order, `id` first
    pub fields: &'static [FieldDef],
    /// Relations in compile order
    pub relations: &'static [Relation],
}

impl EntityMeta {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Every filter name with its kind: fields first, then relations
    pub fn filter_names(&self) -> impl Iterator<Item = (&'static str, FilterKind)> + '_ {
        self.fields
            .iter()
            .map(|f| (f.name, f.kind))
            .chain(self.relations.iter().map(|r| (r.filter, FilterKind::Long)))
    }

    /// Columns written on insert/update: scalar fields then foreign keys
    pub fn write_columns(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.column != ID_COLUMN)
            .map(|f| f.column)
            .chain(self.relations.iter().filter_map(|r| match r.kind {
                RelationKind::ManyToOne { column } => Some(column),
                _ => None,
            }))
            .collect()
    }

    /// Many-to-many relations written together with the row
    pub fn owned_links(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.relations.iter().filter(|r| r.owned_link().is_some())
    }
}
