//! Repository port for project aggregate persistence.

use crate::board::domain::Project;
use crate::shared::{ProjectId, Revision, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
///
/// Projects are loaded and saved as whole documents. No transaction API is
/// assumed; [`ProjectRepository::update`] instead performs a compare-and-set
/// on the aggregate revision so that concurrent read-modify-write cycles
/// cannot silently overwrite each other.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the project
    /// ID already exists.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Replaces a stored project when its stored revision still equals
    /// `project.revision()`, and returns the new revision.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist, or [`ProjectRepositoryError::RevisionConflict`] when another
    /// writer saved it first.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<Revision>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns every project owned by the workspace, oldest first.
    async fn find_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<Project>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The stored revision differs from the one the caller loaded.
    #[error("project {id} was modified concurrently (expected revision {expected}, found {actual})")]
    RevisionConflict {
        /// Project identifier.
        id: ProjectId,
        /// Revision the caller loaded.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
