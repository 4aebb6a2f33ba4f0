use super::{classify, AccessKind, AccessPath, SystemProperty};
use crate::schema::{
    app::ClassId,
    db::{Column, ColumnId},
    mapping, Schema,
};
use crate::{Error, Result};

/// Resolves access paths to the physical columns backing them.
///
/// All lookups go through the mapping built for the import, so a shared
/// column alias resolves to the same `ps<N>` column every time.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    schema: &'a Schema,
}

#[derive(Debug)]
pub struct Resolved<'a> {
    pub kind: AccessKind,

    /// Columns backing the path, in member order
    pub columns: Vec<&'a Column>,
}

impl<'a> Resolver<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn resolve(&self, class: ClassId, path: &AccessPath) -> Result<Resolved<'a>> {
        let kind = classify(&self.schema.app, class, path)?;
        let mapping = self.schema.mapping_for(class);

        let columns = match path {
            AccessPath::System(system) => system_column(mapping, *system, self.schema).map(|c| vec![c]),
            AccessPath::Property(segments) => segments
                .split_first()
                .and_then(|(first, rest)| member_columns(mapping.properties.get(first)?, rest)),
        };

        let Some(columns) = columns else {
            return Err(Error::property_not_found(
                self.schema.app.class(class).full_name(),
                path.to_string(),
            ));
        };

        Ok(Resolved {
            kind,
            columns: columns
                .into_iter()
                .map(|column| self.schema.db.column(column))
                .collect(),
        })
    }

    /// Resolves a path that must map to exactly one column. The column may
    /// still be virtual.
    pub fn resolve_scalar(&self, class: ClassId, path: &AccessPath) -> Result<&'a Column> {
        let resolved = self.resolve(class, path)?;
        let class_name = || self.schema.app.class(class).full_name();

        if !resolved.kind.is_scalar() {
            return Err(Error::not_scalar(
                class_name(),
                path.to_string(),
                resolved.kind.describe(),
            ));
        }

        match resolved.columns[..] {
            [column] => Ok(column),
            _ => Err(Error::not_scalar(class_name(), path.to_string(), "multi-column value")),
        }
    }
}

fn system_column(
    mapping: &mapping::Class,
    system: SystemProperty,
    schema: &Schema,
) -> Option<ColumnId> {
    let link = mapping.link;

    match system {
        SystemProperty::InstanceId => Some(schema.db.table(mapping.data_table()?).id_column()?.id),
        SystemProperty::ClassId => Some(schema.db.table(mapping.data_table()?).class_id_column()?.id),
        SystemProperty::SourceInstanceId => link.map(|link| link.source_id),
        SystemProperty::SourceClassId => link.map(|link| link.source_class_id),
        SystemProperty::TargetInstanceId => link.map(|link| link.target_id),
        SystemProperty::TargetClassId => link.map(|link| link.target_class_id),
    }
}

fn member_columns(property: &mapping::Property, rest: &[String]) -> Option<Vec<ColumnId>> {
    let Some((next, rest)) = rest.split_first() else {
        return Some(property.columns());
    };

    match property {
        mapping::Property::Struct(members) => member_columns(members.get(next)?, rest),
        mapping::Property::Point(point) if rest.is_empty() => match next.as_str() {
            "X" => Some(vec![point.x]),
            "Y" => Some(vec![point.y]),
            "Z" => point.z.map(|z| vec![z]),
            _ => None,
        },
        mapping::Property::Navigation(navigation) if rest.is_empty() => match next.as_str() {
            "Id" => Some(vec![navigation.id]),
            "RelECClassId" => Some(vec![navigation.rel_class_id]),
            _ => None,
        },
        _ => None,
    }
}
