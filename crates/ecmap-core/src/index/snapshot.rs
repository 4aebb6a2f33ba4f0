use crate::schema::{app::ClassId, db, Schema};

/// The committed index set of one import.
///
/// Snapshots refer to tables and columns by name so they stay meaningful
/// across imports, which renumber tables. The caller persists the snapshot
/// of the last successful import and hands it to the next one.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub indexes: Vec<IndexDef>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexDef {
    pub name: String,
    pub table: String,
    pub unique: bool,
    pub columns: Vec<String>,
    pub predicate: Option<PredicateDef>,

    /// Trailing columns may be appended by a later import
    pub extendable: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredicateDef {
    pub not_null: Vec<String>,
    pub class_ids: Option<ClassIdsDef>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassIdsDef {
    pub column: String,
    pub ids: Vec<ClassId>,
}

impl Snapshot {
    /// Captures every emitted index except primary keys, which are part of
    /// the table definition.
    pub fn capture(schema: &Schema) -> Snapshot {
        Snapshot {
            indexes: schema
                .db
                .indices()
                .filter(|index| !index.primary_key)
                .map(|index| IndexDef::new(&schema.db, index))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|index| index.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl IndexDef {
    fn new(schema: &db::Schema, index: &db::Index) -> IndexDef {
        let column_name = |column: &db::ColumnId| schema.column(*column).name.clone();

        IndexDef {
            name: index.name.clone(),
            table: schema.table(index.on).name.clone(),
            unique: index.unique,
            columns: index.columns.iter().map(column_name).collect(),
            predicate: index.predicate.as_ref().map(|predicate| PredicateDef {
                not_null: predicate.not_null.iter().map(column_name).collect(),
                class_ids: predicate.class_ids.as_ref().map(|filter| ClassIdsDef {
                    column: column_name(&filter.column),
                    ids: filter.classes.clone(),
                }),
            }),
            extendable: index.extendable,
        }
    }

    /// Equal in everything the database sees.
    pub(crate) fn same_shape(&self, other: &IndexDef) -> bool {
        self.name == other.name
            && self.table == other.table
            && self.unique == other.unique
            && self.columns == other.columns
            && self.predicate == other.predicate
    }

    pub(crate) fn not_null(&self) -> &[String] {
        self.predicate
            .as_ref()
            .map(|predicate| predicate.not_null.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn class_ids(&self) -> Option<&ClassIdsDef> {
        self.predicate.as_ref()?.class_ids.as_ref()
    }
}
