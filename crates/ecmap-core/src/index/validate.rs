//! Structural validation of declared indexes.

use super::{AccessPath, Resolver, Transition};
use crate::schema::{
    app::{self, ClassId, DbIndex},
    db::{Column, ColumnId, Index, TableId},
    mapping::Strategy,
    Schema,
};
use crate::{err, Error, Result};

use tracing::debug;

const INDEXED_COLUMNS_ARE_NOT_NULL: &str = "IndexedColumnsAreNotNull";

/// A declared index that passed validation, resolved to its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidIndex {
    /// Final index name
    pub name: String,

    /// Class declaring the index
    pub class: ClassId,

    /// Class whose rows the index covers. Differs from `class` when an
    /// abstract class hands its index down to its single sealed subclass.
    pub scope: ClassId,

    pub on: TableId,

    /// Columns in declaration order
    pub columns: Vec<ColumnId>,

    pub unique: bool,

    /// `Where=IndexedColumnsAreNotNull` was declared
    pub not_null: bool,

    /// Position, in the implicit set, of the system index this declaration
    /// names and extends.
    pub extends: Option<usize>,
}

/// Validates every `DbIndexList` in the schema.
///
/// The first failure aborts validation; no partial result is returned.
pub fn validate(schema: &Schema, implicit: &[Index]) -> Result<Vec<ValidIndex>> {
    let mut cx = Validate {
        schema,
        resolver: Resolver::new(schema),
        implicit,
        valid: vec![],
        declarations: vec![],
    };

    for class in schema.app.classes() {
        cx.visit_class(class)?;
    }

    Ok(cx.valid)
}

struct Validate<'a> {
    schema: &'a Schema,
    resolver: Resolver<'a>,
    implicit: &'a [Index],

    valid: Vec<ValidIndex>,

    /// The declaration behind each entry of `valid`
    declarations: Vec<&'a DbIndex>,
}

impl<'a> Validate<'a> {
    fn visit_class(&mut self, class: &'a app::Class) -> Result<()> {
        let mut lists = class.db_index_lists().peekable();
        if lists.peek().is_none() {
            return Ok(());
        }

        if class.is_mixin() {
            return Err(Error::index_on_mixin_not_supported(class.full_name()));
        }

        for list in lists {
            let indexes = match &list.indexes {
                Some(indexes) if !indexes.is_empty() => indexes,
                _ => {
                    return Err(Error::malformed_index_declaration(
                        class.full_name(),
                        "'Indexes' is missing or empty",
                    ))
                }
            };

            for declaration in indexes {
                let mut valid = self.validate_index(class, declaration)?;
                self.check_name(class, declaration, &mut valid)?;

                debug!(
                    index = %valid.name,
                    class = %class.full_name(),
                    columns = valid.columns.len(),
                    "declared index is valid"
                );
                self.valid.push(valid);
                self.declarations.push(declaration);
            }
        }

        Ok(())
    }

    fn validate_index(&self, class: &app::Class, declaration: &DbIndex) -> Result<ValidIndex> {
        let Some(declared_name) = declaration.name.as_deref().filter(|name| !name.is_empty()) else {
            return Err(Error::malformed_index_declaration(
                class.full_name(),
                "'DbIndex' has no 'Name'",
            ));
        };

        if declaration.properties.is_empty() {
            return Err(Error::malformed_index_declaration(
                class.full_name(),
                format!("index '{declared_name}' has no 'Properties'"),
            ));
        }

        let not_null = where_clause(class, declared_name, declaration.where_clause.as_deref())?;
        let (scope, name) = self.scope(class, declared_name, declaration.is_unique)?;

        let mut columns: Vec<&Column> = vec![];
        for access in &declaration.properties {
            let invalid = || Error::invalid_indexed_property(declared_name, access.as_str());

            let column = self
                .resolver
                .resolve_scalar(scope, &AccessPath::parse(access))
                .map_err(|err| err.context(invalid()))?;

            if column.is_virtual() {
                return Err(err!("column '{}' is virtual", column.name).context(invalid()));
            }

            columns.push(column);
        }

        let mut tables: Vec<TableId> = vec![];
        for column in &columns {
            if !tables.contains(&column.id.table) {
                tables.push(column.id.table);
            }
        }

        let on = match tables[..] {
            [table] => table,
            _ => {
                return Err(Error::cross_table_index(
                    declared_name,
                    tables
                        .iter()
                        .map(|table| self.schema.db.table(*table).name.clone()),
                ))
            }
        };

        Ok(ValidIndex {
            name,
            class: class.id,
            scope,
            on,
            columns: columns.iter().map(|column| column.id).collect(),
            unique: declaration.is_unique,
            not_null,
            extends: None,
        })
    }

    /// Picks the class whose rows the index covers, and the final index name.
    ///
    /// Rows must be singled out by one table: the class is a member of a
    /// table-per-hierarchy mapping, is sealed, or is abstract with exactly
    /// one sealed subclass.
    fn scope(&self, class: &app::Class, name: &str, unique: bool) -> Result<(ClassId, String)> {
        let schema = self.schema;
        let mapping = schema.mapping_for(class.id);
        let illegal = || Error::illegal_index_scope(name, class.full_name(), unique);

        match mapping.strategy {
            // Relationship pseudo-properties have no storage here and fail
            // to resolve.
            Strategy::TablePerHierarchy { .. } | Strategy::ForeignKey => {
                Ok((class.id, name.to_string()))
            }
            Strategy::OwnTable if mapping.table.is_some() && class.is_sealed() => {
                Ok((class.id, name.to_string()))
            }
            Strategy::OwnTable if mapping.table.is_none() && class.is_abstract() => {
                let [subclass] = schema.app.direct_subclasses(class.id) else {
                    return Err(illegal());
                };

                match schema.table_for(*subclass) {
                    Some(table) if schema.app.class(*subclass).is_sealed() => {
                        debug!(
                            index = name,
                            class = %class.full_name(),
                            table = %table.name,
                            "index moves to the single sealed subclass"
                        );
                        Ok((*subclass, format!("{name}_{}", table.name)))
                    }
                    _ => Err(illegal()),
                }
            }
            _ => Err(illegal()),
        }
    }

    fn check_name(&self, class: &app::Class, declaration: &DbIndex, valid: &mut ValidIndex) -> Result<()> {
        if let Some(pos) = self.valid.iter().position(|other| other.name == valid.name) {
            if self.valid[pos].class == class.id && self.declarations[pos] == declaration {
                return Err(Error::malformed_index_declaration(
                    class.full_name(),
                    format!("index '{}' is declared twice", valid.name),
                ));
            }
            return Err(Error::duplicate_index_name(&valid.name));
        }

        let system = self
            .implicit
            .iter()
            .enumerate()
            .find(|(_, index)| !index.primary_key && index.name == valid.name);

        let Some((pos, system)) = system else {
            return Ok(());
        };

        // A declaration may name a system index to append trailing columns
        let extends = system.on == valid.on
            && system.unique == valid.unique
            && valid.columns.starts_with(&system.columns);

        if !extends {
            return Err(Error::duplicate_index_name(&valid.name));
        }

        if valid.columns.len() > system.columns.len() && !system.extendable {
            return Err(Error::upgrade_rejected(&valid.name, Transition::ColumnsAppended));
        }

        valid.extends = Some(pos);
        Ok(())
    }
}

fn where_clause(class: &app::Class, index: &str, token: Option<&str>) -> Result<bool> {
    match token.map(str::trim) {
        None | Some("") => Ok(false),
        Some(token) if token.eq_ignore_ascii_case(INDEXED_COLUMNS_ARE_NOT_NULL) => Ok(true),
        Some(token) => Err(Error::malformed_index_declaration(
            class.full_name(),
            format!("index '{index}' has unknown 'Where' token '{token}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::app::Class;

    #[test]
    fn where_tokens() {
        let class = Class::entity("ts", "Foo");

        assert!(!where_clause(&class, "ix", None).unwrap());
        assert!(!where_clause(&class, "ix", Some("")).unwrap());
        assert!(where_clause(&class, "ix", Some("IndexedColumnsAreNotNull")).unwrap());
        assert!(where_clause(&class, "ix", Some("indexedcolumnsarenotnull")).unwrap());

        let err = where_clause(&class, "ix", Some("Anything")).unwrap_err();
        assert!(err.is_malformed_index_declaration());
        assert_eq!(
            err.to_string(),
            "malformed index declaration on 'ts:Foo': index 'ix' has unknown 'Where' token 'Anything'"
        );
    }
}
