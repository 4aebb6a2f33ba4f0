use super::{Name, Statement};

/// A statement to drop a SQL index.
#[derive(Debug, Clone)]
pub struct DropIndex {
    /// Name of the index.
    pub name: Name,

    /// Whether or not to add an `IF EXISTS` clause.
    pub if_exists: bool,
}

impl Statement {
    /// Drops an index by name.
    ///
    /// Committed indexes are only known by name once the next import has
    /// been built, so no `db::Index` is needed. This function _does not_ add
    /// an `IF EXISTS` clause.
    pub fn drop_index(name: &str) -> Self {
        DropIndex {
            name: Name::from(name),
            if_exists: false,
        }
        .into()
    }

    /// Drops an index if it exists.
    pub fn drop_index_if_exists(name: &str) -> Self {
        DropIndex {
            name: Name::from(name),
            if_exists: true,
        }
        .into()
    }
}

impl From<DropIndex> for Statement {
    fn from(value: DropIndex) -> Self {
        Self::DropIndex(value)
    }
}
