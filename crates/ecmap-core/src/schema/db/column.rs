use super::{table, TableId};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    /// The role the column plays for the mapper.
    pub kind: ColumnKind,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// Virtual columns have no storage and can never be indexed.
    pub persistence: Persistence,

    /// True for the `ps<N>`/`os<N>` slots of a shared-columns table.
    pub shared: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// `Id`, backing `ECInstanceId`
    Id,
    /// `ECClassId`
    ClassId,
    /// `SourceId` on a link table
    SourceId,
    /// `SourceECClassId` on a link table
    SourceClassId,
    /// `TargetId` on a link table
    TargetId,
    /// `TargetECClassId` on a link table
    TargetClassId,
    /// Any property-backed column
    Data,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Persistence {
    Physical,
    Virtual,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    pub fn is_virtual(&self) -> bool {
        self.persistence == Persistence::Virtual
    }
}

impl ColumnId {
    pub(crate) fn placeholder() -> Self {
        Self {
            table: table::TableId::placeholder(),
            index: usize::MAX,
        }
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
