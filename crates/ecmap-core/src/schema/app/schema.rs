use super::{Class, ClassId, CustomAttribute, Property, Relationship};

use indexmap::IndexMap;

/// The class graph of one import.
///
/// Classes live in an arena keyed by [`ClassId`]. Subclass edges are kept
/// as an adjacency list keyed by the base class, so walking a hierarchy never
/// follows references between classes.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub classes: IndexMap<ClassId, Class>,

    /// Direct subclasses in insertion order
    subclasses: IndexMap<ClassId, Vec<ClassId>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a class and returns its identifier.
    ///
    /// Identifiers are handed out sequentially; a graph re-imported with new
    /// classes appended keeps the identifiers of existing classes. The base
    /// class, if any, must already be present.
    pub fn add(&mut self, mut class: Class) -> ClassId {
        let id = ClassId(self.classes.len());
        class.id = id;

        if let Some(base) = class.base {
            assert!(
                self.classes.contains_key(&base),
                "base class {base:?} of {} must be added first",
                class.full_name()
            );
            self.subclasses.entry(base).or_default().push(id);
        }

        self.classes.insert(id, class);
        id
    }

    /// Adds a property to an existing class. Used for navigation properties,
    /// which need the relationship class to exist first.
    pub fn add_property(&mut self, id: ClassId, property: Property) {
        self.class_mut(id).properties.push(property);
    }

    pub fn add_custom_attribute(&mut self, id: ClassId, custom_attribute: impl Into<CustomAttribute>) {
        self.class_mut(id)
            .custom_attributes
            .push(custom_attribute.into());
    }

    pub fn classes(&self) -> impl ExactSizeIterator<Item = &Class> {
        self.classes.values()
    }

    /// Get a class by ID
    pub fn class(&self, id: impl Into<ClassId>) -> &Class {
        self.classes.get(&id.into()).expect("invalid class ID")
    }

    fn class_mut(&mut self, id: ClassId) -> &mut Class {
        self.classes.get_mut(&id).expect("invalid class ID")
    }

    pub fn relationship(&self, id: ClassId) -> Option<&Relationship> {
        self.class(id).as_relationship()
    }

    pub fn direct_subclasses(&self, id: ClassId) -> &[ClassId] {
        self.subclasses.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All subclasses of `id`, transitively, in depth-first order.
    pub fn descendants(&self, id: ClassId) -> Vec<ClassId> {
        let mut ret = vec![];
        let mut stack: Vec<_> = self.direct_subclasses(id).iter().rev().copied().collect();

        while let Some(next) = stack.pop() {
            ret.push(next);
            stack.extend(self.direct_subclasses(next).iter().rev().copied());
        }

        ret
    }

    /// `id` followed by its base classes, nearest first.
    pub fn ancestry(&self, id: ClassId) -> impl Iterator<Item = &Class> + '_ {
        let mut next = Some(id);
        core::iter::from_fn(move || {
            let class = self.class(next?);
            next = class.base;
            Some(class)
        })
    }

    /// The topmost base class of `id`.
    pub fn root_of(&self, id: ClassId) -> ClassId {
        self.ancestry(id).last().map(|class| class.id).unwrap_or(id)
    }

    pub fn is_subclass_of(&self, id: ClassId, base: ClassId) -> bool {
        self.ancestry(id).skip(1).any(|class| class.id == base)
    }

    /// Looks up a property by name, searching base classes when the class
    /// does not declare it. Returns the declaring class with the property.
    pub fn find_property(&self, id: ClassId, name: &str) -> Option<(&Class, &Property)> {
        self.ancestry(id)
            .find_map(|class| class.property_by_name(name).map(|property| (class, property)))
    }

    /// All properties visible on a class, base class properties first. A
    /// property redeclared by a subclass keeps the position of the base
    /// declaration.
    pub fn all_properties(&self, id: ClassId) -> Vec<&Property> {
        let chain: Vec<_> = self.ancestry(id).collect();
        let mut ret: IndexMap<&str, &Property> = IndexMap::new();

        for class in chain.into_iter().rev() {
            for property in &class.properties {
                ret.insert(&property.name, property);
            }
        }

        ret.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::app::Modifier;

    #[test]
    fn descendants_are_depth_first() {
        let mut schema = Schema::new();
        let root = schema.add(Class::entity("ts", "Root"));
        let a = schema.add(Class::entity("ts", "A").extends(root));
        let b = schema.add(Class::entity("ts", "B").extends(root));
        let a1 = schema.add(Class::entity("ts", "A1").extends(a));

        assert_eq!(schema.descendants(root), vec![a, a1, b]);
        assert_eq!(schema.direct_subclasses(root), &[a, b]);
        assert!(schema.descendants(b).is_empty());
        assert_eq!(schema.root_of(a1), root);
        assert!(schema.is_subclass_of(a1, root));
        assert!(!schema.is_subclass_of(root, root));
    }

    #[test]
    fn redeclared_property_keeps_base_position() {
        let mut schema = Schema::new();
        let base = schema.add(
            Class::entity("ts", "Base")
                .modifier(Modifier::Abstract)
                .property(Property::primitive("Code"))
                .property(Property::primitive("Name")),
        );
        let sub = schema.add(
            Class::entity("ts", "Sub")
                .extends(base)
                .property(Property::primitive("Extra"))
                .property(Property::primitive("Code").not_null()),
        );

        let names: Vec<_> = schema
            .all_properties(sub)
            .into_iter()
            .map(|property| (property.name.as_str(), property.is_not_null()))
            .collect();
        assert_eq!(
            names,
            vec![("Code", true), ("Name", false), ("Extra", false)]
        );

        let (declaring, _) = schema.find_property(sub, "Name").unwrap();
        assert_eq!(declaring.id, base);
    }
}
