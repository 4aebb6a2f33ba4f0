use super::Error;

/// Error when a `DbIndexList` declaration is structurally incomplete.
///
/// This occurs when:
/// - The `Indexes` list is missing or empty
/// - A `DbIndex` has no name or no properties
/// - The `Where` token is not recognized
/// - The same index is declared twice on one class
#[derive(Debug)]
pub(super) struct MalformedIndexDeclaration {
    class: Box<str>,
    message: Box<str>,
}

impl std::error::Error for MalformedIndexDeclaration {}

impl core::fmt::Display for MalformedIndexDeclaration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "malformed index declaration on '{}': {}",
            self.class, self.message
        )
    }
}

impl Error {
    /// Creates a malformed index declaration error.
    pub fn malformed_index_declaration(
        class: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MalformedIndexDeclaration(
            MalformedIndexDeclaration {
                class: class.into().into(),
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a malformed index declaration error.
    pub fn is_malformed_index_declaration(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MalformedIndexDeclaration(_))
    }
}
