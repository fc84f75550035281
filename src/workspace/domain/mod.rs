//! Domain model for workspaces and their members.

mod error;
mod workspace;

pub use error::{ParseMemberRoleError, WorkspaceDomainError};
pub use workspace::{Member, MemberRole, Workspace, WorkspaceDraft, WorkspacePatch};
