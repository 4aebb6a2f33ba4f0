use super::{Column, ColumnId, ColumnKind, Index, Persistence};

use std::fmt;

/// A database table
#[derive(Debug, Clone)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    pub kind: TableKind,

    /// The table's columns
    pub columns: Vec<Column>,

    /// Indexes emitted for the table. The first entry backs the primary key.
    pub indices: Vec<Index>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Holds the rows of one class or of a whole hierarchy
    Primary,

    /// Holds the properties a direct subclass (and its subclasses) adds to
    /// a hierarchy mapped with joined tables.
    Joined { parent: TableId },

    /// Holds shared-column slots past the overflow threshold
    Overflow { parent: TableId },

    /// A table the mapper binds to but does not own
    Existing,
}

impl Table {
    pub(crate) fn new(id: TableId, name: String, kind: TableKind) -> Self {
        Self {
            id,
            name,
            kind,
            columns: vec![],
            indices: vec![],
        }
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// The first column playing `kind`, for the system columns every table has at most one of.
    pub fn system_column(&self, kind: ColumnKind) -> Option<&Column> {
        self.columns.iter().find(|column| column.kind == kind)
    }

    pub fn id_column(&self) -> Option<&Column> {
        self.system_column(ColumnKind::Id)
    }

    pub fn class_id_column(&self) -> Option<&Column> {
        self.system_column(ColumnKind::ClassId)
    }

    pub fn is_existing(&self) -> bool {
        matches!(self.kind, TableKind::Existing)
    }

    pub(crate) fn push_column(
        &mut self,
        name: String,
        kind: ColumnKind,
        nullable: bool,
        persistence: Persistence,
        shared: bool,
    ) -> ColumnId {
        let id = ColumnId {
            table: self.id,
            index: self.columns.len(),
        };
        self.columns.push(Column {
            id,
            name,
            kind,
            nullable,
            persistence,
            shared,
        });
        id
    }
}

impl TableId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
