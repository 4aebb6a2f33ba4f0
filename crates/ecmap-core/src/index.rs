//! The index pipeline.
//!
//! Declared indexes arrive as access strings on `DbIndexList` custom
//! attributes. They are parsed once into [`AccessPath`]s, resolved to
//! physical columns by the [`Resolver`], validated against the class graph
//! and the implicit system indexes, and finally merged with those into the
//! emitted index set. Between imports the emitted set is captured as a
//! [`Snapshot`] and reconciled with the next one.

mod access;
pub use access::{classify, AccessKind, AccessPath, Axis, SystemProperty};

mod resolve;
pub use resolve::{Resolved, Resolver};

pub mod emit;

pub mod implicit;

mod snapshot;
pub use snapshot::{ClassIdsDef, IndexDef, PredicateDef, Snapshot};

pub mod upgrade;
pub use upgrade::{reconcile, IndexChange, Transition, Upgrade};

pub mod validate;
