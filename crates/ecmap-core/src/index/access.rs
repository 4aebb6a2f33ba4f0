use crate::schema::app::{self, ClassId, PropertyKind};
use crate::{Error, Result};

use std::fmt;

/// A parsed access string, as listed in a `DbIndex`'s `Properties`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPath {
    /// One of the reserved system property names
    System(SystemProperty),

    /// A property, followed by member segments
    Property(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemProperty {
    InstanceId,
    ClassId,
    SourceInstanceId,
    SourceClassId,
    TargetInstanceId,
    TargetClassId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// What an access path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    System(SystemProperty),
    Primitive,
    StructMember,
    PointMember(Axis),
    NavigationId,
    NavigationRelClassId,

    // Containers; none of these maps to a single column.
    Struct,
    StructArray,
    PrimitiveArray,
    Point,
    Navigation,
}

impl AccessPath {
    /// Parses an access string. The reserved names are matched
    /// case-sensitively; anything else is split on `.`.
    pub fn parse(access: &str) -> AccessPath {
        match SystemProperty::from_name(access) {
            Some(system) => AccessPath::System(system),
            None => AccessPath::Property(access.split('.').map(str::to_string).collect()),
        }
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPath::System(system) => f.write_str(system.name()),
            AccessPath::Property(segments) => f.write_str(&segments.join(".")),
        }
    }
}

impl SystemProperty {
    const ALL: [SystemProperty; 6] = [
        SystemProperty::InstanceId,
        SystemProperty::ClassId,
        SystemProperty::SourceInstanceId,
        SystemProperty::SourceClassId,
        SystemProperty::TargetInstanceId,
        SystemProperty::TargetClassId,
    ];

    pub fn from_name(name: &str) -> Option<SystemProperty> {
        Self::ALL.into_iter().find(|system| system.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            SystemProperty::InstanceId => "ECInstanceId",
            SystemProperty::ClassId => "ECClassId",
            SystemProperty::SourceInstanceId => "SourceECInstanceId",
            SystemProperty::SourceClassId => "SourceECClassId",
            SystemProperty::TargetInstanceId => "TargetECInstanceId",
            SystemProperty::TargetClassId => "TargetECClassId",
        }
    }
}

impl Axis {
    fn from_name(name: &str) -> Option<Axis> {
        match name {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

impl AccessKind {
    /// Returns `true` when the path maps to exactly one column.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            AccessKind::System(_)
                | AccessKind::Primitive
                | AccessKind::StructMember
                | AccessKind::PointMember(_)
                | AccessKind::NavigationId
                | AccessKind::NavigationRelClassId
        )
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            AccessKind::Struct => "struct",
            AccessKind::StructArray => "struct array",
            AccessKind::PrimitiveArray => "primitive array",
            AccessKind::Point => "point",
            AccessKind::Navigation => "navigation property",
            _ => "scalar",
        }
    }
}

/// Classifies `path` against the properties visible on `class`, inherited
/// ones included.
pub fn classify(app: &app::Schema, class: ClassId, path: &AccessPath) -> Result<AccessKind> {
    let segments = match path {
        AccessPath::System(system) => return Ok(AccessKind::System(*system)),
        AccessPath::Property(segments) => segments,
    };

    let not_found = || Error::property_not_found(app.class(class).full_name(), path.to_string());

    let (first, rest) = segments.split_first().ok_or_else(not_found)?;
    let (_, property) = app.find_property(class, first).ok_or_else(not_found)?;

    classify_member(app, property, rest).ok_or_else(not_found)
}

fn classify_member(app: &app::Schema, property: &app::Property, rest: &[String]) -> Option<AccessKind> {
    let Some((next, rest)) = rest.split_first() else {
        return Some(match property.kind {
            PropertyKind::Primitive => AccessKind::Primitive,
            PropertyKind::PrimitiveArray => AccessKind::PrimitiveArray,
            PropertyKind::Point2d | PropertyKind::Point3d => AccessKind::Point,
            PropertyKind::Struct(_) => AccessKind::Struct,
            PropertyKind::StructArray(_) => AccessKind::StructArray,
            PropertyKind::Navigation(_) => AccessKind::Navigation,
        });
    };

    match &property.kind {
        PropertyKind::Struct(target) => {
            let (_, member) = app.find_property(*target, next)?;
            match classify_member(app, member, rest)? {
                AccessKind::Primitive => Some(AccessKind::StructMember),
                kind => Some(kind),
            }
        }
        PropertyKind::Point2d | PropertyKind::Point3d if rest.is_empty() => {
            match Axis::from_name(next)? {
                Axis::Z if matches!(property.kind, PropertyKind::Point2d) => None,
                axis => Some(AccessKind::PointMember(axis)),
            }
        }
        PropertyKind::Navigation(_) if rest.is_empty() => match next.as_str() {
            "Id" => Some(AccessKind::NavigationId),
            "RelECClassId" => Some(AccessKind::NavigationRelClassId),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::app::{
        Class, Multiplicity, NavigationDirection, Property, Relationship, RelationshipEnd,
    };

    fn schema() -> (app::Schema, ClassId) {
        let mut schema = app::Schema::new();
        let inner = schema.add(Class::structure("ts", "Inner").property(Property::point2d("P")));
        let address = schema.add(
            Class::structure("ts", "Address")
                .property(Property::primitive("City"))
                .property(Property::structure("Inner", inner)),
        );
        let foo = schema.add(
            Class::entity("ts", "Foo")
                .property(Property::primitive("Code"))
                .property(Property::structure("Address", address))
                .property(Property::point3d("Location"))
                .property(Property::primitive_array("Tags")),
        );
        let rel = schema.add(Class::relationship(
            "ts",
            "FooOwnsFoo",
            Relationship::new(
                RelationshipEnd::new(Multiplicity::ZERO_ONE, foo),
                RelationshipEnd::new(Multiplicity::ZERO_MANY, foo),
            ),
        ));
        schema.add_property(
            foo,
            Property::navigation("Parent", rel, NavigationDirection::Backward),
        );
        (schema, foo)
    }

    #[test]
    fn system_names_are_case_sensitive() {
        assert_eq!(
            AccessPath::parse("ECInstanceId"),
            AccessPath::System(SystemProperty::InstanceId)
        );
        assert_eq!(
            AccessPath::parse("ecinstanceid"),
            AccessPath::Property(vec!["ecinstanceid".to_string()])
        );
        assert_eq!(AccessPath::parse("Address.City").to_string(), "Address.City");
    }

    #[test]
    fn classify_scalars() {
        let (schema, foo) = schema();
        let classify = |access: &str| classify(&schema, foo, &AccessPath::parse(access));

        assert_eq!(classify("Code").unwrap(), AccessKind::Primitive);
        assert_eq!(classify("Address.City").unwrap(), AccessKind::StructMember);
        assert_eq!(
            classify("Address.Inner.P.Y").unwrap(),
            AccessKind::PointMember(Axis::Y)
        );
        assert_eq!(classify("Location.Z").unwrap(), AccessKind::PointMember(Axis::Z));
        assert_eq!(classify("Parent.Id").unwrap(), AccessKind::NavigationId);
        assert_eq!(
            classify("Parent.RelECClassId").unwrap(),
            AccessKind::NavigationRelClassId
        );
        assert_eq!(
            classify("SourceECClassId").unwrap(),
            AccessKind::System(SystemProperty::SourceClassId)
        );
    }

    #[test]
    fn classify_containers() {
        let (schema, foo) = schema();
        let classify = |access: &str| classify(&schema, foo, &AccessPath::parse(access)).unwrap();

        assert_eq!(classify("Address"), AccessKind::Struct);
        assert_eq!(classify("Location"), AccessKind::Point);
        assert_eq!(classify("Tags"), AccessKind::PrimitiveArray);
        assert_eq!(classify("Parent"), AccessKind::Navigation);
        assert!(!classify("Parent").is_scalar());
    }

    #[test]
    fn classify_unknown_segments() {
        let (schema, foo) = schema();

        for access in ["Missing", "Address.Street", "Address.Inner.P.Z", "Code.X", "Parent.Name", ""] {
            let err = classify(&schema, foo, &AccessPath::parse(access)).unwrap_err();
            assert!(err.is_property_not_found(), "{access}: {err}");
        }
    }
}
