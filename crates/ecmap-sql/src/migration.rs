use ecmap_core::{
    index::{Transition, Upgrade},
    schema::db::Schema,
};

use crate::stmt::Statement;

use tracing::debug;

pub struct MigrationStatement<'a> {
    statement: Statement,
    schema: &'a Schema,
}

impl<'a> MigrationStatement<'a> {
    /// Creates every emitted index of a freshly mapped schema. Primary keys
    /// are part of the table definitions and are skipped.
    pub fn create_all(schema: &'a Schema) -> Vec<Self> {
        schema
            .indices()
            .filter(|index| !index.primary_key)
            .map(|index| MigrationStatement {
                statement: Statement::create_index(index),
                schema,
            })
            .collect()
    }

    /// Turns the changes of an accepted upgrade into DDL against the next
    /// schema. Changed indexes are dropped and created again. Changes an
    /// import would have rejected produce no statements.
    pub fn from_upgrade(upgrade: &Upgrade, schema: &'a Schema) -> Vec<Self> {
        let mut result = Vec::new();

        for change in &upgrade.changes {
            let recreate = match change.transition {
                Transition::Unchanged => continue,
                Transition::Added => false,
                Transition::ColumnsAppended | Transition::PredicateRefreshed => true,
                transition => {
                    debug!(index = %change.name, %transition, "rejected transition; skipping");
                    continue;
                }
            };

            let Some(index) = schema.index_by_name(&change.name) else {
                debug!(index = %change.name, "index not in schema; skipping");
                continue;
            };

            if recreate {
                result.push(MigrationStatement {
                    statement: Statement::drop_index(&change.name),
                    schema,
                });
            }

            result.push(MigrationStatement {
                statement: Statement::create_index(index),
                schema,
            });
        }

        result
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }
}
