use super::{ColumnId, TableId};
use crate::schema::app::ClassId;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// Uniquely identifies the index within the schema
    pub id: IndexId,

    /// Index name is unique within the schema
    pub name: String,

    /// The table being indexed
    pub on: TableId,

    /// Columns in index order. The order is significant and preserved as declared.
    pub columns: Vec<ColumnId>,

    /// When `true`, indexed entries are unique
    pub unique: bool,

    /// When `true`, the index is the table's primary key and is not created
    /// as a separate index object.
    pub primary_key: bool,

    /// Partial-index predicate
    pub predicate: Option<Predicate>,

    /// Where the index comes from
    pub origin: IndexOrigin,

    /// When `true`, a later import may append trailing columns. Only indexes
    /// owned by a table-per-hierarchy class are extendable.
    pub extendable: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct IndexId {
    pub table: TableId,
    pub index: usize,
}

/// Conjunction of `col IS NOT NULL` filters and an `ECClassId IN (...)` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub not_null: Vec<ColumnId>,
    pub class_ids: Option<ClassIdFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIdFilter {
    /// The class id column of the indexed table
    pub column: ColumnId,

    /// Sorted, without duplicates
    pub classes: Vec<ClassId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    System(SystemIndex),
    Declared { class: ClassId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemIndex {
    /// Uniqueness of `Id`
    InstanceId,
    /// Lookup on `ECClassId`
    ClassId,
    /// Navigation id column of a physical foreign key
    ForeignKey,
    /// Navigation relationship class id column
    RelClassId,
    /// `SourceId` of a link table
    LinkSource,
    /// `TargetId` of a link table
    LinkTarget,
    /// `(SourceId, TargetId, ECClassId)` of a link table
    LinkUnique,
}

impl Index {
    pub(crate) fn system(
        name: String,
        on: TableId,
        columns: Vec<ColumnId>,
        unique: bool,
        kind: SystemIndex,
    ) -> Self {
        Self {
            id: IndexId::placeholder(),
            name,
            on,
            columns,
            unique,
            primary_key: false,
            predicate: None,
            origin: IndexOrigin::System(kind),
            extendable: false,
        }
    }

    /// Two indexes are equivalent when they cover the same table with the
    /// same uniqueness, ordered columns, and predicate. Names are ignored.
    pub fn is_equivalent(&self, other: &Index) -> bool {
        self.on == other.on
            && self.unique == other.unique
            && self.columns == other.columns
            && self.predicate == other.predicate
    }

    pub fn is_system(&self) -> bool {
        matches!(self.origin, IndexOrigin::System(_))
    }
}

impl Predicate {
    pub fn is_empty(&self) -> bool {
        self.not_null.is_empty() && self.class_ids.is_none()
    }

    /// Returns `None` for an empty predicate.
    pub fn into_option(self) -> Option<Predicate> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl IndexId {
    pub(crate) fn placeholder() -> Self {
        Self {
            table: TableId::placeholder(),
            index: usize::MAX,
        }
    }
}

impl fmt::Debug for IndexId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "IndexId({}/{})", self.table.0, self.index)
    }
}
