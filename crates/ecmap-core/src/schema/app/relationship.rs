use super::ClassId;

use std::fmt;

#[derive(Debug, Clone)]
pub struct Relationship {
    pub source: RelationshipEnd,
    pub target: RelationshipEnd,
}

#[derive(Debug, Clone)]
pub struct RelationshipEnd {
    pub multiplicity: Multiplicity,

    /// When `true`, subclasses of the constraint classes are accepted too
    pub polymorphic: bool,

    /// Constraint classes
    pub classes: Vec<ClassId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub lower: u32,

    /// `None` when unbounded
    pub upper: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Source,
    Target,
}

impl Relationship {
    pub fn new(source: RelationshipEnd, target: RelationshipEnd) -> Self {
        Self { source, target }
    }

    pub fn end(&self, end: End) -> &RelationshipEnd {
        match end {
            End::Source => &self.source,
            End::Target => &self.target,
        }
    }

    /// Both ends may hold more than one instance.
    pub fn is_many_to_many(&self) -> bool {
        self.source.multiplicity.is_many() && self.target.multiplicity.is_many()
    }

    /// Each instance on either end relates to at most one instance on the other.
    pub fn is_one_to_one(&self) -> bool {
        !self.source.multiplicity.is_many() && !self.target.multiplicity.is_many()
    }
}

impl RelationshipEnd {
    pub fn new(multiplicity: Multiplicity, class: ClassId) -> Self {
        Self {
            multiplicity,
            polymorphic: true,
            classes: vec![class],
        }
    }

    pub fn polymorphic(mut self, polymorphic: bool) -> Self {
        self.polymorphic = polymorphic;
        self
    }

    pub fn class(mut self, class: ClassId) -> Self {
        self.classes.push(class);
        self
    }

    /// Rows on this end cannot be told apart by class without storing it.
    pub fn needs_class_id(&self) -> bool {
        self.polymorphic || self.classes.len() > 1
    }
}

impl Multiplicity {
    pub const ZERO_ONE: Multiplicity = Multiplicity::new(0, Some(1));
    pub const ONE_ONE: Multiplicity = Multiplicity::new(1, Some(1));
    pub const ZERO_MANY: Multiplicity = Multiplicity::new(0, None);
    pub const ONE_MANY: Multiplicity = Multiplicity::new(1, None);

    pub const fn new(lower: u32, upper: Option<u32>) -> Self {
        Self { lower, upper }
    }

    pub fn is_many(self) -> bool {
        !matches!(self.upper, Some(upper) if upper <= 1)
    }

    pub fn is_optional(self) -> bool {
        self.lower == 0
    }
}

impl End {
    pub fn opposite(self) -> End {
        match self {
            End::Source => End::Target,
            End::Target => End::Source,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            End::Source => "source",
            End::Target => "target",
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(fmt, "({}..{})", self.lower, upper),
            None => write!(fmt, "({}..*)", self.lower),
        }
    }
}
