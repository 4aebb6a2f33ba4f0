mod class;
pub use class::{Class, LinkColumns, Strategy};

mod property;
pub use property::{Navigation, Point, Property};

use super::app::ClassId;
use indexmap::IndexMap;

/// Defines the correspondence between app-level classes and database-level
/// tables.
///
/// The mapping is built once per import and does not change afterwards.
/// Shared-column aliases recorded here are what every later lookup returns,
/// so a property resolves to the same column for the whole import.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    /// Per-class mappings indexed by class identifier.
    pub classes: IndexMap<ClassId, Class>,
}

impl Mapping {
    /// Returns the mapping for the specified class.
    ///
    /// # Panics
    ///
    /// Panics if the class ID does not exist in the mapping.
    pub fn class(&self, id: impl Into<ClassId>) -> &Class {
        self.classes.get(&id.into()).expect("invalid class ID")
    }
}
