//! Opaque identifier types for every aggregate and entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a raw reference is not a well-formed identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} identifier '{value}'")]
pub struct IdentifierError {
    /// Entity kind the identifier was meant to reference.
    pub kind: &'static str,
    /// Raw value supplied by the caller.
    pub value: String,
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parses a caller-supplied reference.
            ///
            /// # Errors
            ///
            /// Returns [`IdentifierError`] when the value is not a UUID.
            pub fn parse(value: &str) -> Result<Self, IdentifierError> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| IdentifierError {
                        kind: $kind,
                        value: value.to_owned(),
                    })
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a project aggregate.
    ProjectId,
    "project"
);
uuid_identifier!(
    /// Identifier of a column inside a project board.
    ColumnId,
    "column"
);
uuid_identifier!(
    /// Identifier of a task inside a project board.
    TaskId,
    "task"
);
uuid_identifier!(
    /// Unique identifier for a workspace aggregate.
    WorkspaceId,
    "workspace"
);
uuid_identifier!(
    /// Identifier of a user managed by the identity collaborator.
    UserId,
    "user"
);
