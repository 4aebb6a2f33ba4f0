use super::Property;
use crate::schema::{app::ClassId, db::{ColumnId, TableId}};

use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct Class {
    /// The class this mapping is for
    pub id: ClassId,

    /// How the class is stored
    pub strategy: Strategy,

    /// Table holding the class's rows. `None` for classes without storage of
    /// their own: abstract classes outside a hierarchy table, structs,
    /// mixins, foreign-key relationships, and unmapped classes.
    pub table: Option<TableId>,

    /// Joined table holding the properties added below the hierarchy root,
    /// for hierarchies mapped with joined tables.
    pub joined: Option<TableId>,

    /// Property mappings, inherited ones included, keyed by property name.
    pub properties: IndexMap<String, Property>,

    /// Source and target columns, for relationships stored in a link table.
    pub link: Option<LinkColumns>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    OwnTable,
    TablePerHierarchy { root: ClassId },
    ExistingTable,
    /// A relationship stored as navigation columns on one of its ends
    ForeignKey,
    NotMapped,
}

#[derive(Debug, Clone, Copy)]
pub struct LinkColumns {
    pub source_id: ColumnId,
    pub source_class_id: ColumnId,
    pub target_id: ColumnId,
    pub target_class_id: ColumnId,
}

impl Class {
    pub(crate) fn new(id: ClassId, strategy: Strategy) -> Self {
        Self {
            id,
            strategy,
            table: None,
            joined: None,
            properties: IndexMap::new(),
            link: None,
        }
    }

    pub fn is_table_per_hierarchy(&self) -> bool {
        matches!(self.strategy, Strategy::TablePerHierarchy { .. })
    }

    /// Table receiving the properties this class declares itself.
    pub fn data_table(&self) -> Option<TableId> {
        self.joined.or(self.table)
    }
}
