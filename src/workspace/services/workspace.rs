//! Service layer for workspace lifecycle and membership.

use crate::board::ports::{
    MemberWorkspace, WorkspaceGateway, WorkspaceGatewayError, WorkspaceGatewayResult,
};
use crate::config::BoardConfig;
use crate::shared::{ErrorKind, IdentifierError, Patch, ProjectId, UserId, WorkspaceId};
use crate::workspace::{
    domain::{
        Member, MemberRole, Workspace, WorkspaceDomainError, WorkspaceDraft, WorkspacePatch,
    },
    ports::{
        UserDirectory, UserDirectoryError, WorkspaceRepository, WorkspaceRepositoryError,
    },
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkspaceRequest {
    /// Unique workspace name.
    pub name: String,
    /// Raw identifier of the creating user.
    pub created_by: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional image reference.
    pub image_url: Option<String>,
}

impl CreateWorkspaceRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_by: created_by.into(),
            description: None,
            image_url: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Request payload for a partial workspace update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateWorkspaceRequest {
    /// Raw workspace identifier.
    pub workspace_id: String,
    /// New name.
    pub name: Patch<String>,
    /// New description, or `Set(None)` to clear it.
    pub description: Patch<Option<String>>,
    /// New image reference, or `Set(None)` to clear it.
    pub image_url: Patch<Option<String>>,
}

impl UpdateWorkspaceRequest {
    /// Creates an update that changes nothing yet.
    #[must_use]
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            ..Self::default()
        }
    }

    /// Renames the workspace.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Set(name.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Patch::Set(description);
        self
    }

    /// Replaces or clears the image reference.
    #[must_use]
    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = Patch::Set(image_url);
        self
    }
}

/// Request payload for adding a member to a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMemberRequest {
    /// Raw workspace identifier.
    pub workspace_id: String,
    /// Raw identifier of the user joining.
    pub user_id: String,
    /// Role name; `Member` when absent.
    pub role: Option<String>,
}

impl AddMemberRequest {
    /// Creates a request that adds the user with the default role.
    #[must_use]
    pub fn new(workspace_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            user_id: user_id.into(),
            role: None,
        }
    }

    /// Sets the role name.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Service-level errors for workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),
    /// A supplied identifier was malformed.
    #[error(transparent)]
    InvalidReference(#[from] IdentifierError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkspaceRepositoryError),
    /// User directory lookup failed.
    #[error(transparent)]
    Users(#[from] UserDirectoryError),
    /// No workspace exists with the given identifier.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),
    /// No user account exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// Every save attempt lost against a concurrent writer.
    #[error("workspace {workspace_id} is being modified concurrently, gave up after {attempts} attempts")]
    ConcurrentModification {
        /// Contended workspace.
        workspace_id: WorkspaceId,
        /// Number of save attempts made.
        attempts: u32,
    },
}

impl WorkspaceServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::InvalidReference(_) => ErrorKind::Validation,
            Self::Repository(err) => match err {
                WorkspaceRepositoryError::NotFound(_) => ErrorKind::NotFound,
                WorkspaceRepositoryError::DuplicateWorkspace(_)
                | WorkspaceRepositoryError::DuplicateName(_)
                | WorkspaceRepositoryError::RevisionConflict { .. } => ErrorKind::Conflict,
                WorkspaceRepositoryError::Persistence(_) => ErrorKind::Internal,
            },
            Self::Users(_) => ErrorKind::Internal,
            Self::WorkspaceNotFound(_) | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::ConcurrentModification { .. } => ErrorKind::Conflict,
        }
    }
}

/// Result type for workspace service operations.
pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

/// Workspace orchestration service.
#[derive(Clone)]
pub struct WorkspaceService<R, U, C>
where
    R: WorkspaceRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    users: Arc<U>,
    clock: Arc<C>,
    config: BoardConfig,
}

impl<R, U, C> WorkspaceService<R, U, C>
where
    R: WorkspaceRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new workspace service.
    #[must_use]
    pub const fn new(repository: Arc<R>, users: Arc<U>, clock: Arc<C>, config: BoardConfig) -> Self {
        Self {
            repository,
            users,
            clock,
            config,
        }
    }

    async fn find_workspace_or_error(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkspaceServiceResult<Workspace> {
        self.repository
            .find_by_id(workspace_id)
            .await?
            .ok_or(WorkspaceServiceError::WorkspaceNotFound(workspace_id))
    }

    async fn ensure_user_exists(&self, user_id: UserId) -> WorkspaceServiceResult<()> {
        if self.users.exists(user_id).await? {
            Ok(())
        } else {
            Err(WorkspaceServiceError::UserNotFound(user_id))
        }
    }

    /// Loads the workspace, applies `mutation` and saves it, reloading and
    /// re-applying after a revision conflict.
    async fn commit<T, F>(
        &self,
        workspace_id: WorkspaceId,
        mut mutation: F,
    ) -> WorkspaceServiceResult<(Workspace, T)>
    where
        F: FnMut(&mut Workspace, &C) -> Result<T, WorkspaceDomainError> + Send,
        T: Send,
    {
        let attempts = self.config.max_save_attempts().get();
        for attempt in 1..=attempts {
            let mut workspace = self.find_workspace_or_error(workspace_id).await?;
            let outcome = mutation(&mut workspace, &*self.clock)?;
            match self.repository.update(&workspace).await {
                Ok(revision) => {
                    workspace.record_revision(revision);
                    return Ok((workspace, outcome));
                }
                Err(WorkspaceRepositoryError::RevisionConflict {
                    expected, actual, ..
                }) => {
                    tracing::debug!(
                        workspace_id = %workspace_id,
                        attempt,
                        expected = %expected,
                        actual = %actual,
                        "Workspace revision conflict, retrying"
                    );
                }
                Err(err) => {
                    tracing::error!(workspace_id = %workspace_id, error = %err, "Failed to save workspace");
                    return Err(err.into());
                }
            }
        }

        tracing::warn!(workspace_id = %workspace_id, attempts, "Giving up on contended workspace");
        Err(WorkspaceServiceError::ConcurrentModification {
            workspace_id,
            attempts,
        })
    }

    /// Creates a workspace whose creator becomes its first `Admin`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::UserNotFound`] for an unknown
    /// creator, a domain error for a blank name, or a repository error when
    /// the name is already taken.
    pub async fn create_workspace(
        &self,
        request: CreateWorkspaceRequest,
    ) -> WorkspaceServiceResult<Workspace> {
        let created_by = UserId::parse(&request.created_by)?;
        let mut draft = WorkspaceDraft::new(request.name)?;
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        if let Some(image_url) = request.image_url {
            draft = draft.with_image_url(image_url);
        }
        self.ensure_user_exists(created_by).await?;

        let workspace = Workspace::new(draft, created_by, &*self.clock);
        self.repository.store(&workspace).await?;
        tracing::info!(
            workspace_id = %workspace.id(),
            name = workspace.name(),
            "Workspace created"
        );
        Ok(workspace)
    }

    /// Retrieves a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::WorkspaceNotFound`] when absent.
    pub async fn get_workspace(&self, workspace_ref: &str) -> WorkspaceServiceResult<Workspace> {
        let workspace_id = WorkspaceId::parse(workspace_ref)?;
        self.find_workspace_or_error(workspace_id).await
    }

    /// Applies a partial metadata update.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError`] when the identifier is malformed,
    /// the workspace is missing or inactive, the new name is blank or taken,
    /// or the save keeps conflicting.
    pub async fn update_workspace(
        &self,
        request: UpdateWorkspaceRequest,
    ) -> WorkspaceServiceResult<Workspace> {
        let workspace_id = WorkspaceId::parse(&request.workspace_id)?;
        let patch = WorkspacePatch {
            name: request.name,
            description: request.description,
            image_url: request.image_url,
        };
        let (saved, ()) = self
            .commit(workspace_id, |workspace, clock| {
                workspace.apply_patch(patch.clone(), clock)
            })
            .await?;
        Ok(saved)
    }

    /// Soft-deletes a workspace on behalf of one of its admins.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::NotAnAdmin`] (wrapped) when the acting
    /// user is not an active admin, or when the workspace is already
    /// inactive.
    pub async fn deactivate_workspace(
        &self,
        workspace_ref: &str,
        acting_user_ref: &str,
    ) -> WorkspaceServiceResult<Workspace> {
        let workspace_id = WorkspaceId::parse(workspace_ref)?;
        let acting_user = UserId::parse(acting_user_ref)?;
        let (saved, ()) = self
            .commit(workspace_id, |workspace, clock| {
                workspace.deactivate(acting_user, clock)
            })
            .await?;
        tracing::info!(workspace_id = %workspace_id, user_id = %acting_user, "Workspace deactivated");
        Ok(saved)
    }

    /// Adds a user to the workspace, or reactivates a former member.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::UserNotFound`] for an unknown user, a
    /// domain error for an invalid role or an already active member.
    pub async fn add_member(&self, request: AddMemberRequest) -> WorkspaceServiceResult<Workspace> {
        let workspace_id = WorkspaceId::parse(&request.workspace_id)?;
        let user_id = UserId::parse(&request.user_id)?;
        let role = request
            .role
            .as_deref()
            .map(MemberRole::try_from)
            .transpose()
            .map_err(WorkspaceDomainError::from)?
            .unwrap_or_default();
        self.ensure_user_exists(user_id).await?;

        let (saved, ()) = self
            .commit(workspace_id, |workspace, clock| {
                workspace.add_member(user_id, role, clock)
            })
            .await?;
        tracing::info!(
            workspace_id = %workspace_id,
            user_id = %user_id,
            role = role.as_str(),
            "Member added"
        );
        Ok(saved)
    }

    /// Marks a member inactive.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`WorkspaceDomainError::MemberNotFound`] when the
    /// user is not an active member.
    pub async fn deactivate_member(
        &self,
        workspace_ref: &str,
        user_ref: &str,
    ) -> WorkspaceServiceResult<Workspace> {
        let workspace_id = WorkspaceId::parse(workspace_ref)?;
        let user_id = UserId::parse(user_ref)?;
        let (saved, ()) = self
            .commit(workspace_id, |workspace, clock| {
                workspace.deactivate_member(user_id, clock)
            })
            .await?;
        tracing::info!(workspace_id = %workspace_id, user_id = %user_id, "Member deactivated");
        Ok(saved)
    }

    /// Returns the active members of a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::WorkspaceNotFound`] when absent.
    pub async fn members(&self, workspace_ref: &str) -> WorkspaceServiceResult<Vec<Member>> {
        let workspace = self.get_workspace(workspace_ref).await?;
        Ok(workspace
            .members()
            .iter()
            .filter(|member| member.is_active())
            .cloned()
            .collect())
    }

    /// Returns the active workspaces where the user is an active member.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError`] for a malformed identifier or a
    /// repository failure.
    pub async fn workspaces_for_user(
        &self,
        user_ref: &str,
    ) -> WorkspaceServiceResult<Vec<Workspace>> {
        let user_id = UserId::parse(user_ref)?;
        let workspaces = self.repository.find_by_member(user_id).await?;
        Ok(workspaces
            .into_iter()
            .filter(Workspace::is_active)
            .collect())
    }

    /// Registers a project with the workspace. Linking twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::WorkspaceNotFound`] or a wrapped
    /// [`WorkspaceDomainError::WorkspaceInactive`].
    pub async fn link_project(
        &self,
        workspace_id: WorkspaceId,
        project_id: ProjectId,
    ) -> WorkspaceServiceResult<Workspace> {
        let (saved, linked) = self
            .commit(workspace_id, |workspace, clock| {
                workspace.link_project(project_id, clock)
            })
            .await?;
        if linked {
            tracing::info!(workspace_id = %workspace_id, project_id = %project_id, "Project linked");
        }
        Ok(saved)
    }
}

#[async_trait]
impl<R, U, C> WorkspaceGateway for WorkspaceService<R, U, C>
where
    R: WorkspaceRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    async fn active_member_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceGatewayResult<Option<MemberRole>> {
        let workspace = self
            .find_workspace_or_error(workspace_id)
            .await
            .map_err(into_gateway_error)?;
        Ok(workspace.active_role(user_id))
    }

    async fn register_project(
        &self,
        workspace_id: WorkspaceId,
        project_id: ProjectId,
    ) -> WorkspaceGatewayResult<()> {
        self.link_project(workspace_id, project_id)
            .await
            .map(|_| ())
            .map_err(into_gateway_error)
    }

    async fn member_workspaces(
        &self,
        user_id: UserId,
    ) -> WorkspaceGatewayResult<Vec<MemberWorkspace>> {
        let workspaces = self
            .repository
            .find_by_member(user_id)
            .await
            .map_err(WorkspaceGatewayError::unavailable)?;
        Ok(workspaces
            .iter()
            .filter(|workspace| workspace.is_active())
            .map(|workspace| MemberWorkspace {
                workspace_id: workspace.id(),
                name: workspace.name().to_owned(),
            })
            .collect())
    }
}

fn into_gateway_error(err: WorkspaceServiceError) -> WorkspaceGatewayError {
    match err {
        WorkspaceServiceError::WorkspaceNotFound(workspace_id)
        | WorkspaceServiceError::Repository(WorkspaceRepositoryError::NotFound(workspace_id)) => {
            WorkspaceGatewayError::WorkspaceNotFound(workspace_id)
        }
        other => WorkspaceGatewayError::unavailable(other),
    }
}
