use crate::schema::db::ColumnId;

use indexmap::IndexMap;

/// Columns backing one property.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Primitive(ColumnId),

    /// Primitive and struct arrays are stored serialized in one column.
    Array(ColumnId),

    /// One entry per struct member, keyed by member name.
    Struct(IndexMap<String, Property>),

    Point(Point),

    Navigation(Navigation),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: ColumnId,
    pub y: ColumnId,
    /// `None` for 2d points
    pub z: Option<ColumnId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigation {
    /// `<Nav>Id`
    pub id: ColumnId,
    /// `<Nav>RelECClassId`
    pub rel_class_id: ColumnId,
}

impl Property {
    /// All columns backing the property, in member order.
    pub fn columns(&self) -> Vec<ColumnId> {
        let mut ret = vec![];
        self.collect_columns(&mut ret);
        ret
    }

    fn collect_columns(&self, dst: &mut Vec<ColumnId>) {
        match self {
            Property::Primitive(column) | Property::Array(column) => dst.push(*column),
            Property::Struct(members) => {
                for member in members.values() {
                    member.collect_columns(dst);
                }
            }
            Property::Point(point) => {
                dst.push(point.x);
                dst.push(point.y);
                dst.extend(point.z);
            }
            Property::Navigation(navigation) => {
                dst.push(navigation.id);
                dst.push(navigation.rel_class_id);
            }
        }
    }

    pub fn as_navigation(&self) -> Option<&Navigation> {
        match self {
            Property::Navigation(navigation) => Some(navigation),
            _ => None,
        }
    }
}
