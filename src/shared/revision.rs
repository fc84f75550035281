//! Aggregate version token used for optimistic concurrency.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic revision of a persisted aggregate.
///
/// Repositories accept an update only when the stored revision still equals
/// the revision the aggregate was loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Revision carried by an aggregate that has never been updated.
    #[must_use]
    pub const fn initial() -> Self {
        Self(1)
    }

    /// Rebuilds a revision read from storage.
    #[must_use]
    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// Returns the revision that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
