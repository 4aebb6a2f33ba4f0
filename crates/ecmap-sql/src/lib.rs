pub mod migration;
pub use migration::MigrationStatement;

pub mod serializer;
pub use serializer::Serializer;

pub mod stmt;
pub use stmt::Statement;
