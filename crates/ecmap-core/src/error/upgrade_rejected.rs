use super::Error;
use crate::index::Transition;

/// Error when a schema upgrade would change a committed index in a way that
/// is not allowed. The whole upgrade is abandoned.
#[derive(Debug)]
pub(super) struct UpgradeRejected {
    index: Box<str>,
    transition: Transition,
}

impl std::error::Error for UpgradeRejected {}

impl core::fmt::Display for UpgradeRejected {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "upgrade rejected: index '{}' cannot be changed ({})",
            self.index, self.transition
        )
    }
}

impl Error {
    /// Creates an upgrade rejected error for the given index and transition.
    pub fn upgrade_rejected(index: impl Into<String>, transition: Transition) -> Error {
        Error::from(super::ErrorKind::UpgradeRejected(UpgradeRejected {
            index: index.into().into(),
            transition,
        }))
    }

    /// Returns `true` if this error is an upgrade rejected error.
    pub fn is_upgrade_rejected(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UpgradeRejected(_))
    }

    /// Returns the transition that caused the upgrade to be rejected.
    pub fn rejected_transition(&self) -> Option<Transition> {
        match self.kind() {
            super::ErrorKind::UpgradeRejected(err) => Some(err.transition),
            _ => None,
        }
    }
}
