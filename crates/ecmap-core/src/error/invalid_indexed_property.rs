use super::Error;

/// Error when a declared index lists a property that does not resolve to
/// exactly one physical column.
///
/// The reason is carried as the cause of this error.
#[derive(Debug)]
pub(super) struct InvalidIndexedProperty {
    index: Box<str>,
    property: Box<str>,
}

impl std::error::Error for InvalidIndexedProperty {}

impl core::fmt::Display for InvalidIndexedProperty {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "index '{}' cannot include '{}'",
            self.index, self.property
        )
    }
}

impl Error {
    /// Creates an invalid indexed property error.
    pub fn invalid_indexed_property(
        index: impl Into<String>,
        property: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidIndexedProperty(
            InvalidIndexedProperty {
                index: index.into().into(),
                property: property.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid indexed property error.
    pub fn is_invalid_indexed_property(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidIndexedProperty(_))
    }
}
