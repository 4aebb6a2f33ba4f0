use super::{ClassId, End};

#[derive(Debug, Clone)]
pub struct Property {
    /// Name of the property
    pub name: String,

    /// What the property holds
    pub kind: PropertyKind,

    /// `PropertyMap` custom attribute, if any
    pub map: Option<PropertyMap>,
}

#[derive(Debug, Clone)]
pub enum PropertyKind {
    Primitive,
    PrimitiveArray,
    Point2d,
    Point3d,
    Struct(ClassId),
    StructArray(ClassId),
    Navigation(Navigation),
}

#[derive(Debug, Clone)]
pub struct Navigation {
    /// The relationship class the navigation property follows
    pub relationship: ClassId,

    pub direction: NavigationDirection,
}

/// Forward navigation properties sit on the source end of their
/// relationship, backward ones on the target end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    pub is_nullable: Option<bool>,
}

impl Property {
    fn new(name: &str, kind: PropertyKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            map: None,
        }
    }

    pub fn primitive(name: &str) -> Self {
        Self::new(name, PropertyKind::Primitive)
    }

    pub fn primitive_array(name: &str) -> Self {
        Self::new(name, PropertyKind::PrimitiveArray)
    }

    pub fn point2d(name: &str) -> Self {
        Self::new(name, PropertyKind::Point2d)
    }

    pub fn point3d(name: &str) -> Self {
        Self::new(name, PropertyKind::Point3d)
    }

    pub fn structure(name: &str, class: ClassId) -> Self {
        Self::new(name, PropertyKind::Struct(class))
    }

    pub fn struct_array(name: &str, class: ClassId) -> Self {
        Self::new(name, PropertyKind::StructArray(class))
    }

    pub fn navigation(name: &str, relationship: ClassId, direction: NavigationDirection) -> Self {
        Self::new(
            name,
            PropertyKind::Navigation(Navigation {
                relationship,
                direction,
            }),
        )
    }

    /// Marks the property as `IsNullable=false`.
    pub fn not_null(mut self) -> Self {
        self.map = Some(PropertyMap {
            is_nullable: Some(false),
        });
        self
    }

    pub fn is_not_null(&self) -> bool {
        matches!(
            self.map,
            Some(PropertyMap {
                is_nullable: Some(false)
            })
        )
    }

    pub fn as_navigation(&self) -> Option<&Navigation> {
        match &self.kind {
            PropertyKind::Navigation(navigation) => Some(navigation),
            _ => None,
        }
    }
}

impl Navigation {
    /// The relationship end the declaring class sits on.
    pub fn own_end(&self) -> End {
        match self.direction {
            NavigationDirection::Forward => End::Source,
            NavigationDirection::Backward => End::Target,
        }
    }

    /// The relationship end the foreign key points at.
    pub fn referenced_end(&self) -> End {
        self.own_end().opposite()
    }
}
