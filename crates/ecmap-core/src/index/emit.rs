//! Merges declared indexes into the implicit set.

use super::validate::ValidIndex;
use crate::schema::{
    app::ClassId,
    db::{ClassIdFilter, ColumnId, Index, IndexId, IndexOrigin, Predicate},
    Schema,
};

use tracing::{debug, warn};

/// Produces the final index set, implicit indexes first, in the order they
/// were generated, followed by the surviving declared indexes in declaration
/// order.
pub fn emit(schema: &Schema, implicit: Vec<Index>, declared: Vec<ValidIndex>) -> Vec<Index> {
    let mut indices = implicit;

    for valid in declared {
        if let Some(pos) = valid.extends {
            extend(schema, &mut indices[pos], &valid);
            continue;
        }

        // A system index with the same columns wins over the declaration
        // unless the declaration is unique and the system index is not.
        let shadowed_by = indices.iter().find(|index| {
            index.is_system()
                && index.on == valid.on
                && index.columns == valid.columns
                && (index.unique || !valid.unique)
        });

        if let Some(system) = shadowed_by {
            warn!(
                index = %valid.name,
                system = %system.name,
                "declared index duplicates a system index; dropped"
            );
            continue;
        }

        let predicate = Predicate {
            not_null: not_null_columns(schema, &valid),
            class_ids: class_id_filter(schema, &valid),
        };

        debug!(index = %valid.name, ?predicate, "emit declared index");

        indices.push(Index {
            id: IndexId::placeholder(),
            name: valid.name,
            on: valid.on,
            columns: valid.columns,
            unique: valid.unique,
            primary_key: false,
            predicate: predicate.into_option(),
            origin: IndexOrigin::Declared { class: valid.class },
            extendable: schema.mapping_for(valid.scope).is_table_per_hierarchy(),
        });
    }

    indices
}

/// Appends the declared trailing columns to the system index the
/// declaration names. Validation guarantees the system columns are a prefix.
/// A not-null filter on the declaration applies even when no column is
/// appended.
fn extend(schema: &Schema, system: &mut Index, valid: &ValidIndex) {
    if system.columns == valid.columns {
        debug!(index = %system.name, "declaration restates a system index");
    } else {
        debug!(
            index = %system.name,
            from = system.columns.len(),
            to = valid.columns.len(),
            "extend system index"
        );
        system.columns.clone_from(&valid.columns);
    }

    let mut predicate = system.predicate.take().unwrap_or_default();
    for column in not_null_columns(schema, valid) {
        if !predicate.not_null.contains(&column) {
            predicate.not_null.push(column);
        }
    }
    system.predicate = predicate.into_option();
}

/// Nullable indexed columns, when the declaration asks to index non-null
/// rows only.
fn not_null_columns(schema: &Schema, valid: &ValidIndex) -> Vec<ColumnId> {
    if !valid.not_null {
        return vec![];
    }

    valid
        .columns
        .iter()
        .copied()
        .filter(|column| schema.db.column(*column).nullable)
        .collect()
}

/// An index declared below the class owning a hierarchy table covers the
/// rows of the declaring class and its current subclasses only.
fn class_id_filter(schema: &Schema, valid: &ValidIndex) -> Option<ClassIdFilter> {
    if !schema.mapping_for(valid.scope).is_table_per_hierarchy() {
        return None;
    }

    let column = schema
        .db
        .table(valid.on)
        .class_id_column()
        .filter(|column| !column.is_virtual())?;
    let owner = schema.table_owner(valid.on)?;

    let classes = hierarchy(schema, valid.scope);
    if classes == hierarchy(schema, owner) {
        return None;
    }

    Some(ClassIdFilter {
        column: column.id,
        classes,
    })
}

/// `class` and all its subclasses, sorted.
fn hierarchy(schema: &Schema, class: ClassId) -> Vec<ClassId> {
    let mut classes = schema.app.descendants(class);
    classes.push(class);
    classes.sort();
    classes
}
