//! In-memory adapters for workspaces and users.

mod users;
mod workspace;

pub use users::InMemoryUserDirectory;
pub use workspace::InMemoryWorkspaceRepository;
