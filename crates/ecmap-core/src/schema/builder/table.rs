use super::BuildSchema;
use crate::{
    schema::{
        app::{self, ClassId},
        db::{ColumnId, ColumnKind, Persistence, Table, TableId, TableKind},
        mapping,
    },
    Error, Result,
};

use indexmap::IndexMap;
use tracing::debug;

/// Where the properties of one class are being placed
struct Placement {
    /// Class declaring the properties
    class: ClassId,

    /// Table receiving the columns
    table: TableId,

    /// Set when the class maps its properties to shared columns
    shared: Option<SharedSlots>,
}

struct SharedSlots {
    /// Last slot taken
    last: usize,

    max_before_overflow: Option<usize>,
}

impl BuildSchema<'_> {
    pub(super) fn table_name_for(&self, class: &app::Class) -> String {
        let name = format!("{}_{}", class.schema_alias, class.name);
        if let Some(prefix) = &self.builder.table_name_prefix {
            format!("{prefix}{name}")
        } else {
            name
        }
    }

    /// Creates a table with its `Id` and `ECClassId` columns.
    pub(super) fn create_table(
        &mut self,
        name: String,
        kind: TableKind,
        class_id: Persistence,
    ) -> Result<TableId> {
        if self.table_lookup.contains_key(&name) {
            return Err(Error::invalid_schema(format!(
                "more than one class maps to table '{name}'"
            )));
        }

        let id = TableId(self.tables.len());
        self.table_lookup.insert(name.clone(), id);

        let mut table = Table::new(id, name, kind);
        table.push_column("Id".to_string(), ColumnKind::Id, false, Persistence::Physical, false);
        table.push_column(
            "ECClassId".to_string(),
            ColumnKind::ClassId,
            false,
            class_id,
            false,
        );

        debug!(table = %table.name, ?kind, "created table");
        self.tables.push(table);
        Ok(id)
    }

    pub(super) fn create_link_columns(
        &mut self,
        table: TableId,
        class: &app::Class,
    ) -> Option<mapping::LinkColumns> {
        let relationship = class.as_relationship()?;
        let table = &mut self.tables[table.0];

        let class_id_persistence = |end: &app::RelationshipEnd| {
            if end.needs_class_id() {
                Persistence::Physical
            } else {
                Persistence::Virtual
            }
        };

        let source_id = table.push_column(
            "SourceId".to_string(),
            ColumnKind::SourceId,
            false,
            Persistence::Physical,
            false,
        );
        let source_class_id = table.push_column(
            "SourceECClassId".to_string(),
            ColumnKind::SourceClassId,
            false,
            class_id_persistence(&relationship.source),
            false,
        );
        let target_id = table.push_column(
            "TargetId".to_string(),
            ColumnKind::TargetId,
            false,
            Persistence::Physical,
            false,
        );
        let target_class_id = table.push_column(
            "TargetECClassId".to_string(),
            ColumnKind::TargetClassId,
            false,
            class_id_persistence(&relationship.target),
            false,
        );

        Some(mapping::LinkColumns {
            source_id,
            source_class_id,
            target_id,
            target_class_id,
        })
    }

    /// Maps the properties a class declares itself into its data table.
    /// Inherited properties were copied from the base class mapping.
    pub(super) fn map_declared_properties(
        &mut self,
        mapping: &mut mapping::Class,
        class: &app::Class,
    ) -> Result<()> {
        let Some(table) = mapping.data_table() else {
            return Ok(());
        };

        let shared = if mapping.is_table_per_hierarchy() {
            self.share_policy(class).map(|max_before_overflow| {
                let last = class
                    .base
                    .filter(|base| self.mapping.class(*base).data_table() == Some(table))
                    .and_then(|base| self.slots_used.get(&base).copied())
                    .unwrap_or(0);

                SharedSlots {
                    last,
                    max_before_overflow,
                }
            })
        } else {
            None
        };

        let mut at = Placement {
            class: class.id,
            table,
            shared,
        };

        for property in &class.properties {
            // A redeclared property keeps the column of the base declaration
            if mapping.properties.contains_key(&property.name) {
                continue;
            }

            let mapped = self.map_property(&mut at, property.name.clone(), property)?;
            mapping.properties.insert(property.name.clone(), mapped);
        }

        if let Some(shared) = at.shared {
            self.slots_used.insert(class.id, shared.last);
        }

        Ok(())
    }

    /// Maps every visible property, inherited ones included, into the class's
    /// own table.
    pub(super) fn map_all_properties(
        &mut self,
        mapping: &mut mapping::Class,
        class: &app::Class,
    ) -> Result<()> {
        let Some(table) = mapping.table else {
            return Ok(());
        };

        let app = self.app;
        let mut at = Placement {
            class: class.id,
            table,
            shared: None,
        };

        for property in app.all_properties(class.id) {
            let mapped = self.map_property(&mut at, property.name.clone(), property)?;
            mapping.properties.insert(property.name.clone(), mapped);
        }

        Ok(())
    }

    /// Returns `Some(max_before_overflow)` when the class's own properties
    /// go to shared columns.
    fn share_policy(&self, class: &app::Class) -> Option<Option<usize>> {
        self.app
            .ancestry(class.id)
            .find_map(|ancestor| {
                let share = ancestor.share_columns()?;
                Some(if ancestor.id == class.id && share.apply_to_subclasses_only {
                    None
                } else {
                    Some(share.max_shared_columns_before_overflow)
                })
            })
            .flatten()
    }

    fn map_property(
        &mut self,
        at: &mut Placement,
        column_name: String,
        property: &app::Property,
    ) -> Result<mapping::Property> {
        let app = self.app;
        let nullable = !property.is_not_null();

        Ok(match &property.kind {
            app::PropertyKind::Primitive => {
                mapping::Property::Primitive(self.data_column(at, column_name, nullable)?)
            }
            app::PropertyKind::PrimitiveArray | app::PropertyKind::StructArray(_) => {
                mapping::Property::Array(self.data_column(at, column_name, true)?)
            }
            app::PropertyKind::Point2d | app::PropertyKind::Point3d => {
                let x = self.data_column(at, format!("{column_name}_X"), nullable)?;
                let y = self.data_column(at, format!("{column_name}_Y"), nullable)?;
                let z = match property.kind {
                    app::PropertyKind::Point3d => {
                        Some(self.data_column(at, format!("{column_name}_Z"), nullable)?)
                    }
                    _ => None,
                };
                mapping::Property::Point(mapping::Point { x, y, z })
            }
            app::PropertyKind::Struct(target) => {
                let mut members = IndexMap::new();
                for member in app.all_properties(*target) {
                    let mapped =
                        self.map_property(at, format!("{column_name}_{}", member.name), member)?;
                    members.insert(member.name.clone(), mapped);
                }
                mapping::Property::Struct(members)
            }
            app::PropertyKind::Navigation(navigation) => {
                self.map_navigation(at, &column_name, property, navigation)?
            }
        })
    }

    fn map_navigation(
        &mut self,
        at: &mut Placement,
        name: &str,
        property: &app::Property,
        navigation: &app::Navigation,
    ) -> Result<mapping::Property> {
        let app = self.app;
        let relationship_class = app.class(navigation.relationship);
        let Some(relationship) = relationship_class.as_relationship() else {
            return Err(Error::invalid_schema(format!(
                "'{}' is not a relationship",
                relationship_class.full_name()
            )));
        };

        let referenced = relationship.end(navigation.referenced_end());
        let nullable = referenced.multiplicity.is_optional() && !property.is_not_null();
        let id = self.data_column(at, format!("{name}Id"), nullable)?;

        let virtual_class_id = relationship_class.is_sealed()
            || !referenced.needs_class_id()
            || self.tables[at.table.0].is_existing();

        let rel_class_id = if virtual_class_id {
            let column_name = self.unique_column_name(at.table, at.class, format!("{name}RelECClassId"));
            self.tables[at.table.0].push_column(
                column_name,
                ColumnKind::Data,
                true,
                Persistence::Virtual,
                false,
            )
        } else {
            self.data_column(at, format!("{name}RelECClassId"), nullable)?
        };

        Ok(mapping::Property::Navigation(mapping::Navigation { id, rel_class_id }))
    }

    /// Creates the column for one scalar value, taking the next shared slot
    /// when the class shares columns.
    fn data_column(&mut self, at: &mut Placement, name: String, nullable: bool) -> Result<ColumnId> {
        if let Some(shared) = &mut at.shared {
            shared.last += 1;
            let (slot, max) = (shared.last, shared.max_before_overflow);
            return self.shared_column(at.table, slot, max);
        }

        let name = self.unique_column_name(at.table, at.class, name);
        Ok(self.tables[at.table.0].push_column(
            name,
            ColumnKind::Data,
            nullable,
            Persistence::Physical,
            false,
        ))
    }

    /// Returns the column backing shared slot `slot` (1-based) of `table`,
    /// creating the slot columns up to it. Slots past `max_before_overflow`
    /// live in the overflow table.
    fn shared_column(
        &mut self,
        table: TableId,
        slot: usize,
        max_before_overflow: Option<usize>,
    ) -> Result<ColumnId> {
        let (table, slot, prefix) = match max_before_overflow {
            Some(max) if slot > max => (self.overflow_table(table)?, slot - max, "os"),
            _ => (table, slot, "ps"),
        };

        let pool = self.shared_columns.entry(table).or_default();
        while pool.len() < slot {
            let name = format!("{prefix}{}", pool.len() + 1);
            let id = self.tables[table.0].push_column(
                name,
                ColumnKind::Data,
                true,
                Persistence::Physical,
                true,
            );
            pool.push(id);
        }

        Ok(pool[slot - 1])
    }

    fn overflow_table(&mut self, table: TableId) -> Result<TableId> {
        if let Some(overflow) = self.overflow_tables.get(&table) {
            return Ok(*overflow);
        }

        let name = format!("{}_Overflow", self.tables[table.0].name);
        let overflow = self.create_table(
            name,
            TableKind::Overflow { parent: table },
            Persistence::Physical,
        )?;
        self.overflow_tables.insert(table, overflow);
        Ok(overflow)
    }

    /// Column names clash when sibling classes of one hierarchy declare the
    /// same property. Later declarations are prefixed with the class name.
    fn unique_column_name(&self, table: TableId, class: ClassId, name: String) -> String {
        let table = &self.tables[table.0];
        if table.column_by_name(&name).is_none() {
            return name;
        }

        let prefixed = format!("{}_{}", self.app.class(class).name, name);
        if table.column_by_name(&prefixed).is_none() {
            return prefixed;
        }

        (2..)
            .map(|n| format!("{prefixed}{n}"))
            .find(|candidate| table.column_by_name(candidate).is_none())
            .unwrap_or(prefixed)
    }
}
