//! Repository port for workspace aggregate persistence.

use crate::shared::{Revision, UserId, WorkspaceId};
use crate::workspace::domain::Workspace;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace repository operations.
pub type WorkspaceRepositoryResult<T> = Result<T, WorkspaceRepositoryError>;

/// Workspace persistence contract.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Stores a new workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::DuplicateWorkspace`] when the ID
    /// exists or [`WorkspaceRepositoryError::DuplicateName`] when another
    /// workspace already uses the name.
    async fn store(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()>;

    /// Replaces a stored workspace when its stored revision still equals
    /// `workspace.revision()`, and returns the new revision.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::NotFound`],
    /// [`WorkspaceRepositoryError::RevisionConflict`], or
    /// [`WorkspaceRepositoryError::DuplicateName`] when a rename collides.
    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<Revision>;

    /// Finds a workspace by identifier.
    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>>;

    /// Finds a workspace by its unique name.
    async fn find_by_name(&self, name: &str) -> WorkspaceRepositoryResult<Option<Workspace>>;

    /// Returns the workspaces where the user is an active member.
    async fn find_by_member(&self, user_id: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>>;
}

/// Errors returned by workspace repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceRepositoryError {
    /// A workspace with the same identifier already exists.
    #[error("duplicate workspace identifier: {0}")]
    DuplicateWorkspace(WorkspaceId),

    /// A workspace with the same name already exists.
    #[error("workspace name already in use: {0}")]
    DuplicateName(String),

    /// The workspace was not found.
    #[error("workspace not found: {0}")]
    NotFound(WorkspaceId),

    /// The stored revision differs from the one the caller loaded.
    #[error(
        "workspace {id} was modified concurrently (expected revision {expected}, found {actual})"
    )]
    RevisionConflict {
        /// Workspace identifier.
        id: WorkspaceId,
        /// Revision the caller loaded.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
