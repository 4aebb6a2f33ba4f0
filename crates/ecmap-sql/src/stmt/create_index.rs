use super::{Name, Statement};

use ecmap_core::schema::db::{ColumnId, Index, Predicate, TableId};

#[derive(Debug, Clone)]
pub struct CreateIndex {
    /// Name of the index
    pub name: Name,

    /// Which table to index
    pub on: TableId,

    /// The columns to index, in index order
    pub columns: Vec<ColumnId>,

    /// When true, the index is unique
    pub unique: bool,

    /// Partial index filter
    pub predicate: Option<Predicate>,
}

impl Statement {
    pub fn create_index(index: &Index) -> Self {
        CreateIndex {
            name: Name::from(&index.name[..]),
            on: index.on,
            columns: index.columns.clone(),
            unique: index.unique,
            predicate: index.predicate.clone(),
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
