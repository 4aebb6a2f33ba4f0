use super::*;

impl Verify<'_> {
    /// Every emitted index covers physical columns of the table it is on.
    pub(super) fn verify_index_columns(&self) -> Result<()> {
        for index in self.schema.db.indices() {
            for column in &index.columns {
                let column = self.schema.db.column(*column);

                if column.id.table != index.on {
                    return Err(Error::cross_table_index(
                        &index.name,
                        [
                            self.schema.db.table(index.on).name.clone(),
                            self.schema.db.table(column.id.table).name.clone(),
                        ],
                    ));
                }

                if column.is_virtual() {
                    crate::bail!(
                        "index '{}' includes virtual column '{}'",
                        index.name,
                        column.name
                    );
                }
            }

            if let Some(predicate) = &index.predicate {
                // Filters only refer to the indexed table
                debug_assert!(predicate
                    .not_null
                    .iter()
                    .all(|column| column.table == index.on));
                debug_assert!(predicate
                    .class_ids
                    .as_ref()
                    .map_or(true, |filter| filter.column.table == index.on));
            }
        }

        Ok(())
    }
}
