//! Value types shared by the board and workspace contexts.
//!
//! Identifiers, the optimistic-concurrency [`Revision`] token, the
//! [`Patch`] wrapper used by partial updates, and the transport-independent
//! [`ErrorKind`] classification live here so both bounded contexts agree on
//! them without depending on each other's domain modules.

mod error_kind;
mod ids;
mod patch;
mod revision;

pub use error_kind::ErrorKind;
pub use ids::{ColumnId, IdentifierError, ProjectId, TaskId, UserId, WorkspaceId};
pub use patch::Patch;
pub use revision::Revision;
