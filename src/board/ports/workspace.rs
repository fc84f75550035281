//! Port to the workspace context, the board's authorization boundary.

use crate::shared::{ProjectId, UserId, WorkspaceId};
use crate::workspace::domain::MemberRole;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace gateway operations.
pub type WorkspaceGatewayResult<T> = Result<T, WorkspaceGatewayError>;

/// An active workspace in which a user holds an active membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWorkspace {
    /// Workspace identifier.
    pub workspace_id: WorkspaceId,
    /// Workspace name at the time of the lookup.
    pub name: String,
}

/// Membership queries and project registration against workspaces.
#[async_trait]
pub trait WorkspaceGateway: Send + Sync {
    /// Returns the user's role when they are an active member of the
    /// workspace, or `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceGatewayError::WorkspaceNotFound`] when the workspace
    /// does not exist.
    async fn active_member_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceGatewayResult<Option<MemberRole>>;

    /// Appends the project to the workspace's project list.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceGatewayError::WorkspaceNotFound`] when the workspace
    /// does not exist, or [`WorkspaceGatewayError::Unavailable`] when it could
    /// not be updated.
    async fn register_project(
        &self,
        workspace_id: WorkspaceId,
        project_id: ProjectId,
    ) -> WorkspaceGatewayResult<()>;

    /// Returns the active workspaces where the user is an active member,
    /// oldest first. Unknown users have none.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceGatewayError::Unavailable`] when the lookup fails.
    async fn member_workspaces(
        &self,
        user_id: UserId,
    ) -> WorkspaceGatewayResult<Vec<MemberWorkspace>>;
}

/// Errors returned by workspace gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceGatewayError {
    /// The workspace does not exist.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),

    /// The workspace context failed for a reason unrelated to the request.
    #[error("workspace context unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceGatewayError {
    /// Wraps an underlying failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
