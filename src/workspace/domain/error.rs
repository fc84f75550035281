//! Error types for workspace domain validation.

use crate::shared::{ErrorKind, UserId, WorkspaceId};
use thiserror::Error;

/// Errors returned by workspace domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The workspace name is empty after trimming.
    #[error("workspace name must not be empty")]
    EmptyWorkspaceName,

    /// The member role value is unsupported.
    #[error(transparent)]
    InvalidRole(#[from] ParseMemberRoleError),

    /// The user is already an active member.
    #[error("user {0} is already a member of the workspace")]
    MemberAlreadyActive(UserId),

    /// The user is not an active member.
    #[error("user {0} is not a member of the workspace")]
    MemberNotFound(UserId),

    /// The acting user lacks the `Admin` role.
    #[error("user {0} is not an admin of the workspace")]
    NotAnAdmin(UserId),

    /// The workspace has been deactivated.
    #[error("workspace {0} is deactivated")]
    WorkspaceInactive(WorkspaceId),
}

impl WorkspaceDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyWorkspaceName | Self::InvalidRole(_) => ErrorKind::Validation,
            Self::MemberNotFound(_) => ErrorKind::NotFound,
            Self::MemberAlreadyActive(_) | Self::NotAnAdmin(_) | Self::WorkspaceInactive(_) => {
                ErrorKind::Conflict
            }
        }
    }
}

/// Error returned while parsing a member role.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid member role '{0}', allowed values are: Admin, Member")]
pub struct ParseMemberRoleError(pub String);
