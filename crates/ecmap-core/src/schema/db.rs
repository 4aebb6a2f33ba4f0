//! Database-level schema: tables, columns, and the indexes emitted for them.

mod column;
pub use column::{Column, ColumnId, ColumnKind, Persistence};

mod index;
pub use index::{ClassIdFilter, Index, IndexId, IndexOrigin, Predicate, SystemIndex};

mod schema;
pub use schema::Schema;

mod table;
pub use table::{Table, TableId, TableKind};
