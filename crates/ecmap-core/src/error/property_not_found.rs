use super::Error;

/// Error when an access string does not name a property of the class.
#[derive(Debug)]
pub(super) struct PropertyNotFound {
    class: Box<str>,
    access: Box<str>,
}

impl std::error::Error for PropertyNotFound {}

impl core::fmt::Display for PropertyNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "property '{}' not found on '{}'",
            self.access, self.class
        )
    }
}

impl Error {
    /// Creates a property not found error.
    pub fn property_not_found(class: impl Into<String>, access: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::PropertyNotFound(PropertyNotFound {
            class: class.into().into(),
            access: access.into().into(),
        }))
    }

    /// Returns `true` if this error is a property not found error.
    pub fn is_property_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PropertyNotFound(_))
    }
}
