use super::{
    CustomAttribute, DbIndexList, LinkTableRelationshipMap, MapStrategy, Property,
    Relationship, ShareColumns,
};

use std::fmt;

#[derive(Debug, Clone)]
pub struct Class {
    /// Uniquely identifies the class within the schema. Assigned on insertion.
    pub id: ClassId,

    /// Alias of the schema declaring the class, e.g. `ts`
    pub schema_alias: String,

    /// Name of the class
    pub name: String,

    pub kind: ClassKind,

    pub modifier: Modifier,

    /// Base class, which must be inserted into the schema before this class.
    pub base: Option<ClassId>,

    /// Properties declared by this class. Inherited properties are not repeated.
    pub properties: Vec<Property>,

    pub custom_attributes: Vec<CustomAttribute>,
}

#[derive(Debug, Clone)]
pub enum ClassKind {
    Entity,
    Mixin,
    Struct,
    Relationship(Relationship),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Modifier {
    /// The class may be instantiated and subclassed
    #[default]
    None,

    /// The class may not be instantiated
    Abstract,

    /// The class may not be subclassed
    Sealed,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassId(pub usize);

impl Class {
    fn new(schema_alias: &str, name: &str, kind: ClassKind) -> Self {
        Self {
            id: ClassId::placeholder(),
            schema_alias: schema_alias.to_string(),
            name: name.to_string(),
            kind,
            modifier: Modifier::None,
            base: None,
            properties: vec![],
            custom_attributes: vec![],
        }
    }

    pub fn entity(schema_alias: &str, name: &str) -> Self {
        Self::new(schema_alias, name, ClassKind::Entity)
    }

    pub fn mixin(schema_alias: &str, name: &str) -> Self {
        Self::new(schema_alias, name, ClassKind::Mixin)
    }

    pub fn structure(schema_alias: &str, name: &str) -> Self {
        Self::new(schema_alias, name, ClassKind::Struct)
    }

    pub fn relationship(schema_alias: &str, name: &str, relationship: Relationship) -> Self {
        Self::new(schema_alias, name, ClassKind::Relationship(relationship))
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn sealed(self) -> Self {
        self.modifier(Modifier::Sealed)
    }

    pub fn extends(mut self, base: ClassId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn custom_attribute(mut self, custom_attribute: impl Into<CustomAttribute>) -> Self {
        self.custom_attributes.push(custom_attribute.into());
        self
    }

    /// Qualified name in `alias:Name` form, used in diagnostics.
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.schema_alias, self.name)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifier == Modifier::Abstract
    }

    pub fn is_sealed(&self) -> bool {
        self.modifier == Modifier::Sealed
    }

    pub fn is_mixin(&self) -> bool {
        matches!(self.kind, ClassKind::Mixin)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, ClassKind::Struct)
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match &self.kind {
            ClassKind::Relationship(relationship) => Some(relationship),
            _ => None,
        }
    }

    pub fn property_by_name(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn class_map(&self) -> Option<&MapStrategy> {
        self.custom_attributes.iter().find_map(|ca| match ca {
            CustomAttribute::ClassMap(strategy) => Some(strategy),
            _ => None,
        })
    }

    pub fn share_columns(&self) -> Option<&ShareColumns> {
        self.custom_attributes.iter().find_map(|ca| match ca {
            CustomAttribute::ShareColumns(share_columns) => Some(share_columns),
            _ => None,
        })
    }

    pub fn is_joined_table_per_direct_subclass(&self) -> bool {
        self.custom_attributes
            .iter()
            .any(|ca| matches!(ca, CustomAttribute::JoinedTablePerDirectSubclass))
    }

    pub fn has_foreign_key_constraint(&self) -> bool {
        self.custom_attributes
            .iter()
            .any(|ca| matches!(ca, CustomAttribute::ForeignKeyConstraint(_)))
    }

    pub fn link_table_map(&self) -> Option<&LinkTableRelationshipMap> {
        self.custom_attributes.iter().find_map(|ca| match ca {
            CustomAttribute::LinkTableRelationshipMap(map) => Some(map),
            _ => None,
        })
    }

    pub fn db_index_lists(&self) -> impl Iterator<Item = &DbIndexList> + '_ {
        self.custom_attributes.iter().filter_map(|ca| match ca {
            CustomAttribute::DbIndexList(list) => Some(list),
            _ => None,
        })
    }
}

impl ClassId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl From<&Class> for ClassId {
    fn from(value: &Class) -> Self {
        value.id
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ClassId({})", self.0)
    }
}
