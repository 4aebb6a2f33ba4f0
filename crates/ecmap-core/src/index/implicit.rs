//! System indexes derived from the mapping and the cardinality of
//! relationships.

use crate::schema::{
    app::{self, ClassId},
    db::{ColumnId, Index, Predicate, SystemIndex, Table},
    mapping::Strategy,
    Schema,
};

use std::collections::HashSet;
use tracing::debug;

/// Computes the implicit index set of a mapped schema.
///
/// The result starts, for every table, with the primary key index named
/// `pk_<table>`. It is recomputed on every import and is never persisted on
/// its own.
pub fn generate(schema: &Schema, primary_key_covers_instance_id: bool) -> Vec<Index> {
    let mut gen = Generate {
        schema,
        indices: vec![],
    };

    for table in &schema.db.tables {
        gen.table_indices(table, primary_key_covers_instance_id);
    }

    gen.foreign_key_indices();
    gen.link_table_indices();

    gen.indices
}

struct Generate<'a> {
    schema: &'a Schema,
    indices: Vec<Index>,
}

impl Generate<'_> {
    fn push(&mut self, mut index: Index) {
        index.extendable = !index.primary_key && self.owned_by_hierarchy(&index);

        debug!(
            index = %index.name,
            unique = index.unique,
            extendable = index.extendable,
            "implicit index"
        );
        self.indices.push(index);
    }

    fn owned_by_hierarchy(&self, index: &Index) -> bool {
        self.schema
            .table_owner(index.on)
            .is_some_and(|owner| self.schema.mapping_for(owner).is_table_per_hierarchy())
    }

    fn table_indices(&mut self, table: &Table, primary_key_covers_instance_id: bool) {
        let Some(id) = table.id_column() else {
            return;
        };

        let mut primary_key = Index::system(
            format!("pk_{}", table.name),
            table.id,
            vec![id.id],
            true,
            SystemIndex::InstanceId,
        );
        primary_key.primary_key = true;
        self.push(primary_key);

        if table.is_existing() {
            return;
        }

        if !primary_key_covers_instance_id {
            self.push(Index::system(
                format!("uix_{}_id", table.name),
                table.id,
                vec![id.id],
                true,
                SystemIndex::InstanceId,
            ));
        }

        if let Some(class_id) = table.class_id_column().filter(|column| !column.is_virtual()) {
            self.push(Index::system(
                format!("ix_{}_ecclassid", table.name),
                table.id,
                vec![class_id.id],
                false,
                SystemIndex::ClassId,
            ));
        }
    }

    fn foreign_key_indices(&mut self) {
        let schema = self.schema;
        let mut seen = HashSet::new();

        for mapping in schema.mapping.classes.values() {
            for (name, property) in &mapping.properties {
                let Some(columns) = property.as_navigation() else {
                    continue;
                };

                // Subclasses in a hierarchy table repeat their base's columns
                if !seen.insert(columns.id) {
                    continue;
                }

                let Some((_, app_property)) = schema.app.find_property(mapping.id, name) else {
                    continue;
                };
                let Some(navigation) = app_property.as_navigation() else {
                    continue;
                };

                self.navigation_indices(navigation, columns.id, columns.rel_class_id);
            }
        }
    }

    fn navigation_indices(&mut self, navigation: &app::Navigation, id: ColumnId, rel_class_id: ColumnId) {
        let schema = self.schema;
        let table = schema.db.table(id.table);
        let id_column = schema.db.column(id);

        if table.is_existing() {
            return;
        }

        let rel_root = schema.app.class(schema.app.root_of(navigation.relationship));
        let Some(relationship) = schema.app.relationship(navigation.relationship) else {
            return;
        };

        // Logical foreign keys get no indexes
        let physical_constraint = schema
            .app
            .ancestry(navigation.relationship)
            .any(app::Class::has_foreign_key_constraint);
        if !physical_constraint {
            return;
        }

        let mut unique_id_index = false;

        if !id_column.shared {
            let unique = relationship.is_one_to_one();
            let mut index = Index::system(
                format!(
                    "{}_{}_fk_{}_{}_{}",
                    if unique { "uix" } else { "ix" },
                    table.name,
                    rel_root.schema_alias,
                    rel_root.name,
                    navigation.own_end().as_str()
                ),
                table.id,
                vec![id],
                unique,
                SystemIndex::ForeignKey,
            );
            index.predicate = not_null(id_column.nullable, id);
            unique_id_index = unique;
            self.push(index);
        }

        let rel_class_id_column = schema.db.column(rel_class_id);
        if !rel_class_id_column.is_virtual() && !rel_class_id_column.shared && !unique_id_index {
            let mut index = Index::system(
                format!("ix_{}_{}", table.name, rel_class_id_column.name),
                table.id,
                vec![rel_class_id],
                false,
                SystemIndex::RelClassId,
            );
            index.predicate = not_null(rel_class_id_column.nullable, rel_class_id);
            self.push(index);
        }
    }

    fn link_table_indices(&mut self) {
        let schema = self.schema;

        for mapping in schema.mapping.classes.values() {
            let owns_table = match mapping.strategy {
                Strategy::OwnTable => true,
                Strategy::TablePerHierarchy { root } => root == mapping.id,
                _ => false,
            };

            let (Some(link), Some(table), true) = (mapping.link, mapping.table, owns_table) else {
                continue;
            };
            let table = schema.db.table(table);

            self.push(Index::system(
                format!("ix_{}_source", table.name),
                table.id,
                vec![link.source_id],
                false,
                SystemIndex::LinkSource,
            ));
            self.push(Index::system(
                format!("ix_{}_target", table.name),
                table.id,
                vec![link.target_id],
                false,
                SystemIndex::LinkTarget,
            ));

            if self.allows_duplicate_relationships(mapping.id, mapping.is_table_per_hierarchy()) {
                debug!(table = %table.name, "duplicate relationships allowed; no unique link index");
                continue;
            }

            let mut columns = vec![link.source_id, link.target_id];
            columns.extend(
                table
                    .class_id_column()
                    .filter(|column| !column.is_virtual())
                    .map(|column| column.id),
            );

            self.push(Index::system(
                format!("uix_{}_sourcetargetclassid", table.name),
                table.id,
                columns,
                true,
                SystemIndex::LinkUnique,
            ));
        }
    }

    fn allows_duplicate_relationships(&self, class: ClassId, hierarchy: bool) -> bool {
        let app = &self.schema.app;
        let flag = |class: &app::Class| {
            class
                .link_table_map()
                .is_some_and(|map| map.allow_duplicate_relationships)
        };

        app.ancestry(class).any(flag)
            || (hierarchy && app.descendants(class).into_iter().any(|id| flag(app.class(id))))
    }
}

fn not_null(nullable: bool, column: ColumnId) -> Option<Predicate> {
    Predicate {
        not_null: if nullable { vec![column] } else { vec![] },
        class_ids: None,
    }
    .into_option()
}

