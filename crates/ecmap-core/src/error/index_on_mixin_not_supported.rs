use super::Error;

#[derive(Debug)]
pub(super) struct IndexOnMixinNotSupported {
    class: Box<str>,
}

impl std::error::Error for IndexOnMixinNotSupported {}

impl core::fmt::Display for IndexOnMixinNotSupported {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "indexes cannot be declared on mixin '{}'", self.class)
    }
}

impl Error {
    /// Creates an index-on-mixin error.
    pub fn index_on_mixin_not_supported(class: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::IndexOnMixinNotSupported(
            IndexOnMixinNotSupported {
                class: class.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an index-on-mixin error.
    pub fn is_index_on_mixin_not_supported(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IndexOnMixinNotSupported(_))
    }
}
