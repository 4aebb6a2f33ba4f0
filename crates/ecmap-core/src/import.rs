use crate::index::{self, Snapshot, Upgrade};
use crate::schema::{app, Builder, Schema};
use crate::Result;

use tracing::info;

/// The outcome of one import: the mapped schema with its emitted indexes,
/// the snapshot to commit, and the changes against the previous commit.
#[derive(Debug)]
pub struct Import {
    pub schema: Schema,
    pub snapshot: Snapshot,
    pub upgrade: Upgrade,
}

/// Maps `app`, resolves its indexes, and reconciles them with the
/// `previous` committed snapshot.
///
/// Nothing is returned unless the whole plan validates, so a failed import
/// leaves the committed snapshot as the current one.
pub fn import(builder: &Builder, app: app::Schema, previous: Option<&Snapshot>) -> Result<Import> {
    let schema = builder.build(app)?;
    let snapshot = Snapshot::capture(&schema);

    let upgrade = match previous {
        Some(previous) => index::reconcile(previous, &snapshot)?,
        None => Upgrade::initial(&snapshot),
    };

    info!(
        tables = schema.db.tables.len(),
        indexes = snapshot.indexes.len(),
        upgrade = previous.is_some(),
        "import resolved"
    );

    Ok(Import {
        schema,
        snapshot,
        upgrade,
    })
}
