pub mod app;

mod builder;
pub use builder::Builder;

pub mod db;

pub mod mapping;
use mapping::Mapping;

mod verify;

use app::ClassId;
use db::{Index, IndexId, Table};

#[derive(Debug)]
pub struct Schema {
    /// Application-level schema
    pub app: app::Schema,

    /// Database-level schema
    pub db: db::Schema,

    /// Maps the app-level schema to the db-level schema
    pub mapping: Mapping,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn mapping_for(&self, id: impl Into<ClassId>) -> &mapping::Class {
        self.mapping.class(id)
    }

    /// The table holding the class's rows, if it has one.
    pub fn table_for(&self, id: impl Into<ClassId>) -> Option<&Table> {
        self.mapping.class(id).table.map(|table| self.db.table(table))
    }

    /// The class whose rows fill the table: the hierarchy root for a
    /// hierarchy table, the direct subclass for a joined table.
    pub fn table_owner(&self, table: db::TableId) -> Option<ClassId> {
        let table = match self.db.table(table).kind {
            db::TableKind::Overflow { parent } => parent,
            _ => table,
        };

        self.mapping
            .classes
            .values()
            .find(|class| class.joined == Some(table))
            .or_else(|| {
                self.mapping
                    .classes
                    .values()
                    .find(|class| class.table == Some(table))
            })
            .map(|class| class.id)
    }

    /// Stores emitted indexes in their tables, assigning identifiers in order.
    pub(crate) fn install_indices(&mut self, indices: Vec<Index>) {
        for mut index in indices {
            let table = &mut self.db.tables[index.on.0];
            index.id = IndexId {
                table: table.id,
                index: table.indices.len(),
            };
            table.indices.push(index);
        }
    }
}
