mod table;

use super::{app, db, mapping, Schema};
use crate::schema::mapping::{Mapping, Strategy};
use crate::schema::db::{ColumnId, Table, TableId};
use crate::{index, Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug)]
pub struct Builder {
    /// If set, prefix all generated table names with this string
    table_name_prefix: Option<String>,

    /// When `true`, the primary key guarantees `Id` uniqueness and no
    /// separate unique index is created for it.
    primary_key_covers_instance_id: bool,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    /// Build options
    builder: &'a Builder,

    app: &'a app::Schema,

    /// Maps table names to identifiers
    table_lookup: IndexMap<String, TableId>,

    /// Tables as they are built
    tables: Vec<Table>,

    /// App-level to db-level schema mapping
    mapping: Mapping,

    /// Shared column slots of each table; slot `n` is at position `n - 1`.
    shared_columns: HashMap<TableId, Vec<ColumnId>>,

    /// Overflow table of each table that spilled shared columns
    overflow_tables: HashMap<TableId, TableId>,

    /// Shared slots taken by each class, counting base classes mapped to the
    /// same table.
    slots_used: HashMap<app::ClassId, usize>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            table_name_prefix: None,
            primary_key_covers_instance_id: true,
        }
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn primary_key_covers_instance_id(&mut self, covers: bool) -> &mut Self {
        self.primary_key_covers_instance_id = covers;
        self
    }

    /// Maps the class graph to tables and resolves every index.
    ///
    /// Nothing is returned unless the whole index plan validates.
    pub fn build(&self, app: app::Schema) -> Result<Schema> {
        let mut builder = BuildSchema {
            builder: self,
            app: &app,
            table_lookup: IndexMap::new(),
            tables: vec![],
            mapping: Mapping::default(),
            shared_columns: HashMap::new(),
            overflow_tables: HashMap::new(),
            slots_used: HashMap::new(),
        };

        for class in app.classes() {
            builder.verify_class(class)?;
        }

        // Classes are visited in insertion order, so every base class is
        // mapped before its subclasses.
        for class in app.classes() {
            let strategy = builder.strategy_for(class)?;
            let mapping = builder.build_class_mapping(class, strategy)?;
            builder.mapping.classes.insert(class.id, mapping);
        }

        let BuildSchema {
            tables, mapping, ..
        } = builder;

        let mut schema = Schema {
            app,
            db: db::Schema { tables },
            mapping,
        };

        let implicit = index::implicit::generate(&schema, self.primary_key_covers_instance_id);
        let declared = index::validate::validate(&schema, &implicit)?;
        let indices = index::emit::emit(&schema, implicit, declared);
        schema.install_indices(indices);

        // Verify the schema structure
        schema.verify()?;

        Ok(schema)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildSchema<'_> {
    /// Checks the class graph for references the mapper cannot follow.
    fn verify_class(&self, class: &app::Class) -> Result<()> {
        if let Some(base) = class.base {
            let base = self.app.class(base);

            if std::mem::discriminant(&base.kind) != std::mem::discriminant(&class.kind) {
                return Err(Error::invalid_schema(format!(
                    "'{}' cannot derive from '{}' of a different kind",
                    class.full_name(),
                    base.full_name()
                )));
            }

            let in_hierarchy = self
                .app
                .ancestry(base.id)
                .any(|ancestor| ancestor.class_map() == Some(&app::MapStrategy::TablePerHierarchy));

            if in_hierarchy && class.class_map().is_some() {
                return Err(Error::invalid_schema(format!(
                    "'{}' inherits the table-per-hierarchy mapping and cannot declare its own",
                    class.full_name()
                )));
            }
        }

        for property in &class.properties {
            match &property.kind {
                app::PropertyKind::Struct(target) | app::PropertyKind::StructArray(target) => {
                    if !self.app.classes.contains_key(target) || !self.app.class(*target).is_struct() {
                        return Err(Error::invalid_schema(format!(
                            "property '{}' of '{}' does not refer to a struct",
                            property.name,
                            class.full_name()
                        )));
                    }
                }
                app::PropertyKind::Navigation(navigation) => {
                    self.verify_navigation(class, property, navigation)?
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn verify_navigation(
        &self,
        class: &app::Class,
        property: &app::Property,
        navigation: &app::Navigation,
    ) -> Result<()> {
        let relationship = self
            .app
            .classes
            .get(&navigation.relationship)
            .and_then(app::Class::as_relationship);

        let Some(relationship) = relationship else {
            return Err(Error::invalid_schema(format!(
                "navigation property '{}' of '{}' does not refer to a relationship",
                property.name,
                class.full_name()
            )));
        };

        if class.is_struct() {
            return Err(Error::invalid_schema(format!(
                "struct '{}' cannot have navigation property '{}'",
                class.full_name(),
                property.name
            )));
        }

        if self.uses_link_table(navigation.relationship) {
            return Err(Error::invalid_schema(format!(
                "navigation property '{}' of '{}' follows a link table relationship",
                property.name,
                class.full_name()
            )));
        }

        let referenced = relationship.end(navigation.referenced_end());
        if referenced.multiplicity.is_many() {
            return Err(Error::invalid_schema(format!(
                "navigation property '{}' of '{}' points at the {} end with multiplicity {}",
                property.name,
                class.full_name(),
                navigation.referenced_end().as_str(),
                referenced.multiplicity
            )));
        }

        Ok(())
    }

    /// Relationships get a link table when asked to, when both ends are
    /// many, or when they carry properties of their own.
    fn uses_link_table(&self, relationship: app::ClassId) -> bool {
        let root = self.app.root_of(relationship);
        let class = self.app.class(root);

        let Some(rel) = class.as_relationship() else {
            return false;
        };

        class.link_table_map().is_some()
            || rel.is_many_to_many()
            || !class.properties.is_empty()
            || self
                .app
                .descendants(root)
                .into_iter()
                .any(|id| !self.app.class(id).properties.is_empty())
    }

    fn strategy_for(&self, class: &app::Class) -> Result<Strategy> {
        match class.kind {
            app::ClassKind::Struct | app::ClassKind::Mixin => return Ok(Strategy::NotMapped),
            app::ClassKind::Relationship(_) if !self.uses_link_table(class.id) => {
                return Ok(Strategy::ForeignKey)
            }
            _ => {}
        }

        if let Some(base) = class.base {
            match self.mapping.class(base).strategy {
                Strategy::TablePerHierarchy { root } => {
                    return Ok(Strategy::TablePerHierarchy { root })
                }
                Strategy::NotMapped => return Ok(Strategy::NotMapped),
                _ => {}
            }
        }

        let strategy = match class.class_map() {
            Some(app::MapStrategy::TablePerHierarchy) => Strategy::TablePerHierarchy { root: class.id },
            Some(app::MapStrategy::NotMapped) => Strategy::NotMapped,
            Some(app::MapStrategy::ExistingTable(_)) => Strategy::ExistingTable,
            Some(app::MapStrategy::OwnTable) | None => Strategy::OwnTable,
        };

        debug!(class = %class.full_name(), ?strategy, "mapping strategy");
        Ok(strategy)
    }

    fn build_class_mapping(
        &mut self,
        class: &app::Class,
        strategy: Strategy,
    ) -> Result<mapping::Class> {
        let mut mapping = mapping::Class::new(class.id, strategy);

        match strategy {
            Strategy::NotMapped | Strategy::ForeignKey => {}
            Strategy::TablePerHierarchy { root } if root == class.id => {
                let table = self.create_table(
                    self.table_name_for(class),
                    db::TableKind::Primary,
                    db::Persistence::Physical,
                )?;
                mapping.table = Some(table);
                mapping.link = self.create_link_columns(table, class);
                self.map_declared_properties(&mut mapping, class)?;
            }
            Strategy::TablePerHierarchy { root } => {
                let base = self.mapping.class(class.base.unwrap_or(root)).clone();
                mapping.table = base.table;
                mapping.joined = base.joined;
                mapping.link = base.link;
                mapping.properties = base.properties;

                let joined_root = class.base == Some(root)
                    && self.app.class(root).is_joined_table_per_direct_subclass();

                if let (true, Some(parent)) = (joined_root, base.table) {
                    let joined = self.create_table(
                        self.table_name_for(class),
                        db::TableKind::Joined { parent },
                        db::Persistence::Physical,
                    )?;
                    mapping.joined = Some(joined);
                }

                self.map_declared_properties(&mut mapping, class)?;
            }
            Strategy::OwnTable if class.is_abstract() => {
                debug!(class = %class.full_name(), "abstract class has no table of its own");
            }
            Strategy::OwnTable => {
                let table = self.create_table(
                    self.table_name_for(class),
                    db::TableKind::Primary,
                    db::Persistence::Virtual,
                )?;
                mapping.table = Some(table);
                mapping.link = self.create_link_columns(table, class);
                self.map_all_properties(&mut mapping, class)?;
            }
            Strategy::ExistingTable => {
                let name = match class.class_map() {
                    Some(app::MapStrategy::ExistingTable(name)) => name.clone(),
                    _ => self.table_name_for(class),
                };
                let table = self.create_table(name, db::TableKind::Existing, db::Persistence::Virtual)?;
                mapping.table = Some(table);
                self.map_all_properties(&mut mapping, class)?;
            }
        }

        Ok(mapping)
    }
}
