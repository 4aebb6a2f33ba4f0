mod index_columns;

use super::{
    app::ClassId,
    db::{ColumnId, IndexId, TableId},
    Schema,
};
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_ids_populated());

        self.verify_each_table_has_one_primary_key();
        self.verify_indices_have_columns();
        self.verify_index_names_are_unique()?;
        self.verify_index_columns()?;
        Ok(())
    }

    fn verify_ids_populated(&self) -> bool {
        for class in self.schema.app.classes() {
            assert_ne!(class.id, ClassId::placeholder());
        }

        for table in &self.schema.db.tables {
            assert_ne!(table.id, TableId::placeholder());

            for column in &table.columns {
                assert_ne!(column.id, ColumnId::placeholder());
            }

            for index in &table.indices {
                assert_ne!(index.id, IndexId::placeholder());
            }
        }

        true
    }

    fn verify_each_table_has_one_primary_key(&self) {
        for table in &self.schema.db.tables {
            assert_eq!(
                1,
                table.indices.iter().filter(|i| i.primary_key).count(),
                "table={}",
                table.name
            );
        }
    }

    fn verify_indices_have_columns(&self) {
        for table in &self.schema.db.tables {
            for index in &table.indices {
                assert!(
                    !index.columns.is_empty(),
                    "index={}; table={}",
                    index.name,
                    table.name
                );
            }
        }
    }

    fn verify_index_names_are_unique(&self) -> Result<()> {
        let mut names = HashSet::new();

        for index in self.schema.db.indices() {
            if !names.insert(&index.name) {
                return Err(Error::duplicate_index_name(&index.name));
            }
        }

        Ok(())
    }
}
