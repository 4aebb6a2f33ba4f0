mod adhoc;
mod cross_table_index;
mod duplicate_index_name;
mod illegal_index_scope;
mod index_on_mixin_not_supported;
mod invalid_indexed_property;
mod invalid_schema;
mod malformed_index_declaration;
mod not_scalar;
mod property_not_found;
mod upgrade_rejected;

use adhoc::AdhocError;
use cross_table_index::CrossTableIndex;
use duplicate_index_name::DuplicateIndexName;
use illegal_index_scope::IllegalIndexScope;
use index_on_mixin_not_supported::IndexOnMixinNotSupported;
use invalid_indexed_property::InvalidIndexedProperty;
use invalid_schema::InvalidSchema;
use malformed_index_declaration::MalformedIndexDeclaration;
use not_scalar::NotScalar;
use property_not_found::PropertyNotFound;
use std::sync::Arc;
use upgrade_rejected::UpgradeRejected;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while mapping a schema or reconciling its indexes.
///
/// Every error is fatal to the import that raised it. The error is one
/// pointer wide; context is attached with [`Error::context`] and displayed
/// outermost first.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    /// Returns the innermost error of the context chain.
    pub fn root_cause(&self) -> &Error {
        self.chain().last().unwrap_or(self)
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    InvalidSchema(InvalidSchema),
    PropertyNotFound(PropertyNotFound),
    NotScalar(NotScalar),
    MalformedIndexDeclaration(MalformedIndexDeclaration),
    InvalidIndexedProperty(InvalidIndexedProperty),
    CrossTableIndex(CrossTableIndex),
    IllegalIndexScope(IllegalIndexScope),
    DuplicateIndexName(DuplicateIndexName),
    IndexOnMixinNotSupported(IndexOnMixinNotSupported),
    UpgradeRejected(UpgradeRejected),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            PropertyNotFound(err) => core::fmt::Display::fmt(err, f),
            NotScalar(err) => core::fmt::Display::fmt(err, f),
            MalformedIndexDeclaration(err) => core::fmt::Display::fmt(err, f),
            InvalidIndexedProperty(err) => core::fmt::Display::fmt(err, f),
            CrossTableIndex(err) => core::fmt::Display::fmt(err, f),
            IllegalIndexScope(err) => core::fmt::Display::fmt(err, f),
            DuplicateIndexName(err) => core::fmt::Display::fmt(err, f),
            IndexOnMixinNotSupported(err) => core::fmt::Display::fmt(err, f),
            UpgradeRejected(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown ecmap error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
