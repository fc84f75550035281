//! Port contracts for workspaces.

pub mod repository;
pub mod users;

pub use repository::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult};
pub use users::{UserDirectory, UserDirectoryError};
