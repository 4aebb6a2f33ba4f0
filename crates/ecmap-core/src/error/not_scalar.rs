use super::Error;

/// Error when an access string names a property that spans zero or several
/// columns (a struct or point as a whole, an array, or a bare navigation
/// property).
#[derive(Debug)]
pub(super) struct NotScalar {
    class: Box<str>,
    access: Box<str>,
    what: &'static str,
}

impl std::error::Error for NotScalar {}

impl core::fmt::Display for NotScalar {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "'{}' on '{}' is a {} and does not map to a single column",
            self.access, self.class, self.what
        )
    }
}

impl Error {
    /// Creates a not scalar error. `what` names the kind of container, e.g. `"struct"`.
    pub fn not_scalar(
        class: impl Into<String>,
        access: impl Into<String>,
        what: &'static str,
    ) -> Error {
        Error::from(super::ErrorKind::NotScalar(NotScalar {
            class: class.into().into(),
            access: access.into().into(),
            what,
        }))
    }

    /// Returns `true` if this error is a not scalar error.
    pub fn is_not_scalar(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NotScalar(_))
    }
}
