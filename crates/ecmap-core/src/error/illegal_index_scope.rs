use super::Error;

/// Error when an index is declared on a class whose rows cannot be singled
/// out in storage: an extensible class outside a table-per-hierarchy
/// mapping, an abstract class without exactly one sealed subclass, or a
/// class mapped to an existing or no table.
#[derive(Debug)]
pub(super) struct IllegalIndexScope {
    index: Box<str>,
    class: Box<str>,
    unique: bool,
}

impl std::error::Error for IllegalIndexScope {}

impl core::fmt::Display for IllegalIndexScope {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let what = if self.unique { "unique index" } else { "index" };
        write!(
            f,
            "{} '{}' is not allowed on '{}'",
            what, self.index, self.class
        )
    }
}

impl Error {
    /// Creates an illegal index scope error.
    ///
    /// `unique` records the uniqueness of the rejected declaration and picks
    /// between [`is_illegal_unique_index_scope`](Error::is_illegal_unique_index_scope)
    /// and [`is_illegal_index_scope`](Error::is_illegal_index_scope).
    pub fn illegal_index_scope(
        index: impl Into<String>,
        class: impl Into<String>,
        unique: bool,
    ) -> Error {
        Error::from(super::ErrorKind::IllegalIndexScope(IllegalIndexScope {
            index: index.into().into(),
            class: class.into().into(),
            unique,
        }))
    }

    /// Returns `true` if a unique index was declared out of scope.
    pub fn is_illegal_unique_index_scope(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IllegalIndexScope(err) if err.unique)
    }

    /// Returns `true` if a non-unique index was declared out of scope.
    pub fn is_illegal_index_scope(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IllegalIndexScope(err) if !err.unique)
    }
}
