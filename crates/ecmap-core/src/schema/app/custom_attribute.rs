/// A custom attribute recognized by the mapper.
///
/// Attributes arrive already parsed; anything the mapper does not recognize
/// is dropped by the schema reader and never reaches this type.
#[derive(Debug, Clone)]
pub enum CustomAttribute {
    ClassMap(MapStrategy),
    ShareColumns(ShareColumns),
    JoinedTablePerDirectSubclass,
    DbIndexList(DbIndexList),
    ForeignKeyConstraint(ForeignKeyConstraint),
    LinkTableRelationshipMap(LinkTableRelationshipMap),
    IdentitySpecification(IdentitySpecification),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStrategy {
    OwnTable,
    TablePerHierarchy,
    NotMapped,
    /// Binds the class to a table that exists outside of the mapper's control.
    ExistingTable(String),
}

#[derive(Debug, Clone, Default)]
pub struct ShareColumns {
    /// When set, the class carrying the attribute keeps dedicated columns and
    /// only its subclasses share.
    pub apply_to_subclasses_only: bool,

    /// Number of shared columns in the main table; further properties spill
    /// into an overflow table.
    pub max_shared_columns_before_overflow: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct DbIndexList {
    /// `None` when the `Indexes` element is missing altogether.
    pub indexes: Option<Vec<DbIndex>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbIndex {
    pub name: Option<String>,
    pub is_unique: bool,
    /// Access strings in declaration order
    pub properties: Vec<String>,
    /// `Where` token, `Some("")` for an empty element
    pub where_clause: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ForeignKeyConstraint {
    pub on_delete: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LinkTableRelationshipMap {
    pub allow_duplicate_relationships: bool,
}

/// Marks a property as carrying identity semantics. Never produces an index.
#[derive(Debug, Clone)]
pub struct IdentitySpecification {
    pub kind: IdentityKind,
    pub property: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    BusinessKey,
    GlobalId,
    SyncId,
}

impl DbIndexList {
    pub fn new(indexes: impl IntoIterator<Item = DbIndex>) -> Self {
        Self {
            indexes: Some(indexes.into_iter().collect()),
        }
    }
}

impl DbIndex {
    pub fn new<I, S>(name: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.to_string()),
            is_unique: false,
            properties: properties.into_iter().map(Into::into).collect(),
            where_clause: None,
        }
    }

    pub fn unique<I, S>(name: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_unique: true,
            ..Self::new(name, properties)
        }
    }

    pub fn where_clause(mut self, token: &str) -> Self {
        self.where_clause = Some(token.to_string());
        self
    }
}

impl From<MapStrategy> for CustomAttribute {
    fn from(value: MapStrategy) -> Self {
        Self::ClassMap(value)
    }
}

impl From<ShareColumns> for CustomAttribute {
    fn from(value: ShareColumns) -> Self {
        Self::ShareColumns(value)
    }
}

impl From<DbIndexList> for CustomAttribute {
    fn from(value: DbIndexList) -> Self {
        Self::DbIndexList(value)
    }
}

impl From<ForeignKeyConstraint> for CustomAttribute {
    fn from(value: ForeignKeyConstraint) -> Self {
        Self::ForeignKeyConstraint(value)
    }
}

impl From<LinkTableRelationshipMap> for CustomAttribute {
    fn from(value: LinkTableRelationshipMap) -> Self {
        Self::LinkTableRelationshipMap(value)
    }
}

impl From<IdentitySpecification> for CustomAttribute {
    fn from(value: IdentitySpecification) -> Self {
        Self::IdentitySpecification(value)
    }
}
