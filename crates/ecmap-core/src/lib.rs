mod error;
pub use error::{Error, IntoError};

mod import;
pub use import::{import, Import};

pub mod index;

pub mod schema;
pub use schema::Schema;

/// A Result type alias that uses the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
