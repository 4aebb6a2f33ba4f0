use super::Error;

/// Error when an index name is used for two indexes of different shape.
#[derive(Debug)]
pub(super) struct DuplicateIndexName {
    name: Box<str>,
}

impl std::error::Error for DuplicateIndexName {}

impl core::fmt::Display for DuplicateIndexName {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "duplicate index name '{}'", self.name)
    }
}

impl Error {
    /// Creates a duplicate index name error.
    pub fn duplicate_index_name(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateIndexName(DuplicateIndexName {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate index name error.
    pub fn is_duplicate_index_name(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateIndexName(_))
    }
}
