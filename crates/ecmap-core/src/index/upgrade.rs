//! Reconciles the committed index set with the one a new import emits.

use super::{IndexDef, Snapshot};
use crate::{Error, Result};

use std::fmt;
use tracing::{debug, info};

/// What happened to one index name between two imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    Unchanged,
    Added,

    /// Same leading columns, new trailing ones
    ColumnsAppended,

    /// Only the class id filter changed, because the hierarchy gained or
    /// lost subclasses.
    PredicateRefreshed,

    Removed,

    /// The previous columns are all still there, in a different order
    PropertiesReordered,

    UniquenessChanged,

    /// The name is gone and a new name covers the same columns
    Renamed,

    /// Moved to another table, different columns, or a different not-null
    /// filter
    ShapeChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexChange {
    pub name: String,
    pub transition: Transition,

    /// `None` for added indexes
    pub previous: Option<IndexDef>,

    /// `None` for removed indexes
    pub next: Option<IndexDef>,
}

/// The allowed changes of an upgrade, committed indexes first, followed by
/// added ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Upgrade {
    pub changes: Vec<IndexChange>,
}

impl Transition {
    /// Whether an upgrade may go through this transition. `extendable` is
    /// the flag the index was committed with.
    pub fn is_allowed(self, extendable: bool) -> bool {
        match self {
            Transition::Unchanged | Transition::Added | Transition::PredicateRefreshed => true,
            Transition::ColumnsAppended => extendable,
            Transition::Removed
            | Transition::PropertiesReordered
            | Transition::UniquenessChanged
            | Transition::Renamed
            | Transition::ShapeChanged => false,
        }
    }

    /// Classifies the change between two definitions of the same index name.
    pub fn classify(previous: &IndexDef, next: &IndexDef) -> Transition {
        if previous.same_shape(next) {
            return Transition::Unchanged;
        }

        if previous.table != next.table {
            return Transition::ShapeChanged;
        }

        if previous.unique != next.unique {
            return Transition::UniquenessChanged;
        }

        if previous.columns != next.columns {
            if next.columns.starts_with(&previous.columns) {
                // The not-null filter of the leading columns must not move
                let leading = next
                    .not_null()
                    .iter()
                    .filter(|column| previous.columns.contains(column));

                return if leading.eq(previous.not_null()) {
                    Transition::ColumnsAppended
                } else {
                    Transition::ShapeChanged
                };
            }

            if previous
                .columns
                .iter()
                .all(|column| next.columns.contains(column))
            {
                return Transition::PropertiesReordered;
            }

            return Transition::ShapeChanged;
        }

        if previous.not_null() != next.not_null() {
            return Transition::ShapeChanged;
        }

        debug_assert_ne!(previous.class_ids(), next.class_ids());
        Transition::PredicateRefreshed
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transition::Unchanged => "unchanged",
            Transition::Added => "added",
            Transition::ColumnsAppended => "columns appended",
            Transition::PredicateRefreshed => "predicate refreshed",
            Transition::Removed => "removed",
            Transition::PropertiesReordered => "properties reordered",
            Transition::UniquenessChanged => "uniqueness changed",
            Transition::Renamed => "renamed",
            Transition::ShapeChanged => "shape changed",
        })
    }
}

impl Upgrade {
    /// The upgrade of a store without committed indexes: everything is added.
    pub fn initial(snapshot: &Snapshot) -> Upgrade {
        Upgrade {
            changes: snapshot
                .indexes
                .iter()
                .map(|index| IndexChange::added(index.clone()))
                .collect(),
        }
    }

    /// Returns `true` when no index changes.
    pub fn is_noop(&self) -> bool {
        self.changes
            .iter()
            .all(|change| change.transition == Transition::Unchanged)
    }

    pub fn change(&self, name: &str) -> Option<&IndexChange> {
        self.changes.iter().find(|change| change.name == name)
    }
}

impl IndexChange {
    fn added(next: IndexDef) -> IndexChange {
        IndexChange {
            name: next.name.clone(),
            transition: Transition::Added,
            previous: None,
            next: Some(next),
        }
    }
}

/// Compares the committed snapshot with the next one.
///
/// The first disallowed transition rejects the whole upgrade.
pub fn reconcile(previous: &Snapshot, next: &Snapshot) -> Result<Upgrade> {
    let mut changes = vec![];

    for committed in &previous.indexes {
        let Some(emitted) = next.get(&committed.name) else {
            let transition = if is_renamed(committed, previous, next) {
                Transition::Renamed
            } else {
                Transition::Removed
            };
            return Err(Error::upgrade_rejected(&committed.name, transition));
        };

        let transition = Transition::classify(committed, emitted);
        if !transition.is_allowed(committed.extendable) {
            return Err(Error::upgrade_rejected(&committed.name, transition));
        }

        debug!(index = %committed.name, %transition, "reconciled index");
        changes.push(IndexChange {
            name: committed.name.clone(),
            transition,
            previous: Some(committed.clone()),
            next: Some(emitted.clone()),
        });
    }

    for emitted in &next.indexes {
        if previous.get(&emitted.name).is_none() {
            changes.push(IndexChange::added(emitted.clone()));
        }
    }

    let upgrade = Upgrade { changes };
    info!(
        indexes = upgrade.changes.len(),
        noop = upgrade.is_noop(),
        "upgrade reconciled"
    );
    Ok(upgrade)
}

/// A committed index whose name disappeared while a new name covers the same
/// columns of the same table.
fn is_renamed(committed: &IndexDef, previous: &Snapshot, next: &Snapshot) -> bool {
    let mut columns = committed.columns.clone();
    columns.sort();

    next.indexes
        .iter()
        .filter(|emitted| previous.get(&emitted.name).is_none())
        .any(|emitted| {
            let mut other = emitted.columns.clone();
            other.sort();
            emitted.table == committed.table && other == columns
        })
}
