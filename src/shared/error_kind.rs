//! Transport-independent failure classification.

use std::fmt;

/// Broad category of a service failure.
///
/// Callers (for example an HTTP layer) branch on this value to pick a
/// status code without inspecting individual error variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: bad identifier, missing field, invalid enum value.
    Validation,
    /// A referenced entity does not exist or a lookup precondition failed.
    NotFound,
    /// Uniqueness or business-rule violation.
    Conflict,
    /// Persistence or collaborator failure unrelated to business rules.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
