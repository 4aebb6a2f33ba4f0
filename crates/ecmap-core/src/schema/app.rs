//! Application-level schema: the class graph handed over by the schema reader.

mod class;
pub use class::{Class, ClassId, ClassKind, Modifier};

mod custom_attribute;
pub use custom_attribute::{
    CustomAttribute, DbIndex, DbIndexList, ForeignKeyConstraint, IdentityKind,
    IdentitySpecification, LinkTableRelationshipMap, MapStrategy, ShareColumns,
};

mod property;
pub use property::{Navigation, NavigationDirection, Property, PropertyKind, PropertyMap};

mod relationship;
pub use relationship::{End, Multiplicity, Relationship, RelationshipEnd};

mod schema;
pub use schema::Schema;
