//! Service layer for project boards.
//!
//! Every mutating operation loads the project, applies one in-memory board
//! mutation and persists the whole aggregate with a single revision-checked
//! update. A lost race reloads the project and re-applies the mutation.

use super::requests::{
    AddColumnRequest, AddTaskRequest, CreateProjectRequest, DeleteColumnRequest, MoveTaskRequest,
    ReorderColumnsRequest, UpdateColumnRequest, UpdateProjectRequest, UpdateTaskRequest,
};
use crate::board::{
    domain::{
        Board, BoardDomainError, Column, ColumnPatch, Project, ProjectDraft, ProjectPatch, Task,
        TaskDraft, TaskPatch, TaskPriority,
    },
    ports::{
        MemberWorkspace, ProjectRepository, ProjectRepositoryError, WorkspaceGateway,
        WorkspaceGatewayError,
    },
};
use crate::config::BoardConfig;
use crate::shared::{
    ColumnId, ErrorKind, IdentifierError, ProjectId, TaskId, UserId, WorkspaceId,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Outcome of [`ProjectBoardService::add_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedTask {
    /// The saved project.
    pub project: Project,
    /// Identifier of the new task.
    pub task_id: TaskId,
}

/// An active project reachable through one of the user's workspaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProject {
    /// Name of the owning workspace.
    pub workspace_name: String,
    /// The project.
    pub project: Project,
}

/// An active task assigned to a user, with the names of its project and
/// workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedTask {
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Name of the owning workspace.
    pub workspace_name: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// Name of the owning project.
    pub project_name: String,
    /// The task.
    pub task: Task,
}

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation or invariant check failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// A supplied identifier was malformed.
    #[error(transparent)]
    InvalidReference(#[from] IdentifierError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Workspace lookup failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceGatewayError),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// The creating user is not an active member of the workspace.
    #[error("user {user_id} is not a member of workspace {workspace_id}")]
    CreatorNotMember {
        /// Creating user.
        user_id: UserId,
        /// Target workspace.
        workspace_id: WorkspaceId,
    },
    /// The assignee is not an active member of the project's workspace.
    #[error("assignee {user_id} is not a member of workspace {workspace_id}")]
    AssigneeNotMember {
        /// Requested assignee.
        user_id: UserId,
        /// Workspace owning the project.
        workspace_id: WorkspaceId,
    },
    /// The project was saved but could not be registered with its
    /// workspace.
    #[error("project {project_id} was created but could not be linked to workspace {workspace_id}")]
    WorkspaceLinkFailed {
        /// The stored project.
        project_id: ProjectId,
        /// Workspace that rejected the link.
        workspace_id: WorkspaceId,
        /// Underlying gateway failure.
        #[source]
        source: WorkspaceGatewayError,
    },
    /// Every save attempt lost against a concurrent writer.
    #[error("project {project_id} is being modified concurrently, gave up after {attempts} attempts")]
    ConcurrentModification {
        /// Contended project.
        project_id: ProjectId,
        /// Number of save attempts made.
        attempts: u32,
    },
}

impl BoardServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::InvalidReference(_) => ErrorKind::Validation,
            Self::Repository(err) => match err {
                ProjectRepositoryError::NotFound(_) => ErrorKind::NotFound,
                ProjectRepositoryError::DuplicateProject(_)
                | ProjectRepositoryError::RevisionConflict { .. } => ErrorKind::Conflict,
                ProjectRepositoryError::Persistence(_) => ErrorKind::Internal,
            },
            Self::Workspace(err) => match err {
                WorkspaceGatewayError::WorkspaceNotFound(_) => ErrorKind::NotFound,
                WorkspaceGatewayError::Unavailable(_) => ErrorKind::Internal,
            },
            Self::ProjectNotFound(_) => ErrorKind::NotFound,
            Self::CreatorNotMember { .. }
            | Self::AssigneeNotMember { .. }
            | Self::ConcurrentModification { .. } => ErrorKind::Conflict,
            Self::WorkspaceLinkFailed { .. } => ErrorKind::Internal,
        }
    }
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Project board orchestration service.
#[derive(Clone)]
pub struct ProjectBoardService<R, W, C>
where
    R: ProjectRepository,
    W: WorkspaceGateway,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    workspaces: Arc<W>,
    clock: Arc<C>,
    config: BoardConfig,
}

impl<R, W, C> ProjectBoardService<R, W, C>
where
    R: ProjectRepository,
    W: WorkspaceGateway,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        workspaces: Arc<W>,
        clock: Arc<C>,
        config: BoardConfig,
    ) -> Self {
        Self {
            repository,
            workspaces,
            clock,
            config,
        }
    }

    async fn find_project_or_error(&self, project_id: ProjectId) -> BoardServiceResult<Project> {
        self.repository
            .find_by_id(project_id)
            .await?
            .ok_or(BoardServiceError::ProjectNotFound(project_id))
    }

    async fn ensure_assignee_is_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> BoardServiceResult<()> {
        match self.workspaces.active_member_role(workspace_id, user_id).await? {
            Some(_) => Ok(()),
            None => Err(BoardServiceError::AssigneeNotMember {
                user_id,
                workspace_id,
            }),
        }
    }

    /// Applies `mutation` to `project` and saves it. After a revision
    /// conflict the project is reloaded and the mutation re-applied, up to
    /// the configured attempt bound.
    async fn commit<T, F>(
        &self,
        mut project: Project,
        mut mutation: F,
    ) -> BoardServiceResult<(Project, T)>
    where
        F: FnMut(&mut Project, &C) -> Result<T, BoardDomainError> + Send,
        T: Send,
    {
        let project_id = project.id();
        let attempts = self.config.max_save_attempts().get();
        let mut attempt = 1;
        loop {
            let outcome = mutation(&mut project, &*self.clock)?;
            match self.repository.update(&project).await {
                Ok(revision) => {
                    project.record_revision(revision);
                    return Ok((project, outcome));
                }
                Err(ProjectRepositoryError::RevisionConflict {
                    expected, actual, ..
                }) if attempt < attempts => {
                    tracing::debug!(
                        project_id = %project_id,
                        attempt,
                        expected = %expected,
                        actual = %actual,
                        "Project revision conflict, retrying"
                    );
                    attempt += 1;
                    project = self.find_project_or_error(project_id).await?;
                }
                Err(ProjectRepositoryError::RevisionConflict { .. }) => {
                    tracing::warn!(project_id = %project_id, attempts, "Giving up on contended project");
                    return Err(BoardServiceError::ConcurrentModification {
                        project_id,
                        attempts,
                    });
                }
                Err(err) => {
                    tracing::error!(project_id = %project_id, error = %err, "Failed to save project");
                    return Err(err.into());
                }
            }
        }
    }

    /// Creates a project with either the requested columns or the configured
    /// default board, then registers it with its workspace. An empty column
    /// list counts as no list.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::CreatorNotMember`] when the creator is not
    /// an active member of the workspace, and
    /// [`BoardServiceError::WorkspaceLinkFailed`] when the project was stored
    /// but the workspace could not record it.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> BoardServiceResult<Project> {
        let workspace_id = WorkspaceId::parse(&request.workspace_id)?;
        let created_by = UserId::parse(&request.created_by)?;
        let mut draft = ProjectDraft::new(request.name, workspace_id, created_by)?;
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        if let Some(image_url) = request.image_url {
            draft = draft.with_image_url(image_url);
        }
        let board = match request.columns.filter(|titles| !titles.is_empty()) {
            Some(titles) => Board::with_columns(titles)?,
            None => Board::with_columns(self.config.default_columns().iter().cloned())?,
        };

        if self
            .workspaces
            .active_member_role(workspace_id, created_by)
            .await?
            .is_none()
        {
            return Err(BoardServiceError::CreatorNotMember {
                user_id: created_by,
                workspace_id,
            });
        }

        let project = Project::new(draft, board, &*self.clock);
        self.repository.store(&project).await?;
        tracing::info!(
            project_id = %project.id(),
            workspace_id = %workspace_id,
            columns = project.board().columns().len(),
            "Project created"
        );

        if let Err(source) = self
            .workspaces
            .register_project(workspace_id, project.id())
            .await
        {
            tracing::warn!(
                project_id = %project.id(),
                workspace_id = %workspace_id,
                error = %source,
                "Project stored but not linked to its workspace"
            );
            return Err(BoardServiceError::WorkspaceLinkFailed {
                project_id: project.id(),
                workspace_id,
                source,
            });
        }
        Ok(project)
    }

    /// Retrieves a project, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::ProjectNotFound`] when absent.
    pub async fn get_project(&self, project_ref: &str) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(project_ref)?;
        self.find_project_or_error(project_id).await
    }

    /// Returns the active projects of a workspace, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] for a malformed identifier or a
    /// repository failure.
    pub async fn list_workspace_projects(
        &self,
        workspace_ref: &str,
    ) -> BoardServiceResult<Vec<Project>> {
        let workspace_id = WorkspaceId::parse(workspace_ref)?;
        let projects = self.repository.find_by_workspace(workspace_id).await?;
        Ok(projects.into_iter().filter(Project::is_active).collect())
    }

    async fn member_projects(&self, user_id: UserId) -> BoardServiceResult<Vec<MemberProject>> {
        let mut found = Vec::new();
        for MemberWorkspace {
            workspace_id,
            name: workspace_name,
        } in self.workspaces.member_workspaces(user_id).await?
        {
            let projects = self.repository.find_by_workspace(workspace_id).await?;
            found.extend(
                projects
                    .into_iter()
                    .filter(Project::is_active)
                    .map(|project| MemberProject {
                        workspace_name: workspace_name.clone(),
                        project,
                    }),
            );
        }
        Ok(found)
    }

    /// Returns the active projects of every active workspace where the user
    /// is an active member, grouped by workspace, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] for a malformed identifier or a
    /// repository or workspace failure.
    pub async fn projects_for_user(
        &self,
        user_ref: &str,
    ) -> BoardServiceResult<Vec<MemberProject>> {
        let user_id = UserId::parse(user_ref)?;
        self.member_projects(user_id).await
    }

    /// Returns the active tasks assigned to the user across the projects
    /// listed by [`Self::projects_for_user`], in task creation order per
    /// project.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] for a malformed identifier or a
    /// repository or workspace failure.
    pub async fn tasks_for_user(&self, user_ref: &str) -> BoardServiceResult<Vec<AssignedTask>> {
        let user_id = UserId::parse(user_ref)?;
        let mut assigned = Vec::new();
        for MemberProject {
            workspace_name,
            project,
        } in self.member_projects(user_id).await?
        {
            let tasks = project
                .board()
                .tasks()
                .iter()
                .filter(|task| task.is_active() && task.assignee() == Some(user_id));
            for task in tasks {
                assigned.push(AssignedTask {
                    workspace_id: project.workspace_id(),
                    workspace_name: workspace_name.clone(),
                    project_id: project.id(),
                    project_name: project.name().to_owned(),
                    task: task.clone(),
                });
            }
        }
        tracing::debug!(user_id = %user_id, tasks = assigned.len(), "Listed assigned tasks");
        Ok(assigned)
    }

    /// Applies a partial metadata update.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] when the project is missing or inactive,
    /// the new name is blank, or the save keeps conflicting.
    pub async fn update_project(
        &self,
        request: UpdateProjectRequest,
    ) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let patch = ProjectPatch {
            name: request.name,
            description: request.description,
            image_url: request.image_url,
        };
        let current = self.find_project_or_error(project_id).await?;
        let (saved, ()) = self
            .commit(current, |project, clock| {
                project.apply_patch(patch.clone(), clock)
            })
            .await?;
        Ok(saved)
    }

    /// Soft-deletes a project.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`BoardDomainError::ProjectInactive`] when the
    /// project was already deactivated.
    pub async fn deactivate_project(&self, project_ref: &str) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(project_ref)?;
        let current = self.find_project_or_error(project_id).await?;
        let (saved, ()) = self
            .commit(current, |project, clock| project.deactivate(clock))
            .await?;
        tracing::info!(project_id = %project_id, "Project deactivated");
        Ok(saved)
    }

    /// Appends an empty column to the board and to the display order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] for a blank title, a missing or inactive
    /// project, or a persistence failure.
    pub async fn add_column(&self, request: AddColumnRequest) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let title = request.title;
        let current = self.find_project_or_error(project_id).await?;
        let (saved, column_id) = self
            .commit(current, |project, clock| {
                project.edit_board(clock, |board| board.add_column(title.clone()))
            })
            .await?;
        tracing::debug!(project_id = %project_id, column_id = %column_id, "Column added");
        Ok(saved)
    }

    /// Applies a partial update to a column. A supplied task list replaces
    /// the column's references as given.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] for malformed identifiers, a missing
    /// column, or a blank title.
    pub async fn update_column(&self, request: UpdateColumnRequest) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let column_id = ColumnId::parse(&request.column_id)?;
        let task_ids = request
            .task_ids
            .try_map(|raw_ids| parse_all(&raw_ids, TaskId::parse))?;
        let patch = ColumnPatch {
            title: request.title,
            task_ids,
        };

        let current = self.find_project_or_error(project_id).await?;
        let (saved, ()) = self
            .commit(current, |project, clock| {
                project.edit_board(clock, |board| board.update_column(column_id, patch.clone()))
            })
            .await?;

        let dangling = saved.board().dangling_task_refs();
        if !dangling.is_empty() {
            tracing::warn!(
                project_id = %project_id,
                column_id = %column_id,
                dangling = dangling.len(),
                "Column references tasks that are missing or inactive"
            );
        }
        Ok(saved)
    }

    /// Deletes a column and returns it. Its tasks move to the requested
    /// destination column, or stay in the project unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] when either column is missing or the
    /// destination is the column being deleted.
    pub async fn delete_column(&self, request: DeleteColumnRequest) -> BoardServiceResult<Column> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let column_id = ColumnId::parse(&request.column_id)?;
        let reassign_to = request
            .reassign_to
            .as_deref()
            .map(ColumnId::parse)
            .transpose()?;

        let current = self.find_project_or_error(project_id).await?;
        let (_, removed) = self
            .commit(current, |project, clock| {
                project.edit_board(clock, |board| board.remove_column(column_id, reassign_to))
            })
            .await?;

        if reassign_to.is_none() && !removed.task_ids().is_empty() {
            tracing::warn!(
                project_id = %project_id,
                column_id = %column_id,
                unassigned = removed.task_ids().len(),
                "Deleted column left its tasks unassigned"
            );
        }
        Ok(removed)
    }

    /// Replaces the column display order.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`BoardDomainError::ColumnSetMismatch`] unless the
    /// new order is a permutation of the existing columns.
    pub async fn reorder_columns(
        &self,
        request: ReorderColumnsRequest,
    ) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let new_order = parse_all(&request.order, ColumnId::parse)?;
        let current = self.find_project_or_error(project_id).await?;
        let (saved, ()) = self
            .commit(current, |project, clock| {
                project.edit_board(clock, |board| board.reorder_columns(new_order.clone()))
            })
            .await?;
        Ok(saved)
    }

    /// Creates a task in a column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AssigneeNotMember`] when the assignee is
    /// not an active member of the project's workspace, or a wrapped
    /// [`BoardDomainError`] for a missing column, blank name or unknown
    /// priority. Nothing is written on error.
    pub async fn add_task(&self, request: AddTaskRequest) -> BoardServiceResult<AddedTask> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let column_id = ColumnId::parse(&request.column_id)?;
        let assignee = request.assignee.as_deref().map(UserId::parse).transpose()?;
        let created_by = request
            .created_by
            .as_deref()
            .map(UserId::parse)
            .transpose()?;
        let priority = request
            .priority
            .as_deref()
            .map(TaskPriority::try_from)
            .transpose()
            .map_err(BoardDomainError::from)?;

        let mut draft = TaskDraft::new(request.name)?
            .with_comments(request.comments)
            .with_attachments(request.attachments);
        if let Some(content) = request.content {
            draft = draft.with_content(content);
        }
        if let Some(user_id) = assignee {
            draft = draft.with_assignee(user_id);
        }
        if let Some(due_date) = request.due_date {
            draft = draft.with_due_date(due_date);
        }
        if let Some(level) = priority {
            draft = draft.with_priority(level);
        }
        if let Some(user_id) = created_by {
            draft = draft.with_created_by(user_id);
        }

        let current = self.find_project_or_error(project_id).await?;
        current.ensure_active()?;
        if let Some(user_id) = assignee {
            self.ensure_assignee_is_member(current.workspace_id(), user_id)
                .await?;
        }

        let (saved, task_id) = self
            .commit(current, |project, clock| {
                project.edit_board(clock, |board| board.add_task(column_id, draft.clone(), clock))
            })
            .await?;
        tracing::debug!(project_id = %project_id, task_id = %task_id, "Task added");
        Ok(AddedTask {
            project: saved,
            task_id,
        })
    }

    /// Applies a partial update to an active task without touching column
    /// membership.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AssigneeNotMember`] for a non-member
    /// assignee, or a wrapped [`BoardDomainError::TaskNotFound`] when no
    /// active task has the identifier.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let task_id = TaskId::parse(&request.task_id)?;
        let assignee = request
            .assignee
            .try_map(|raw| raw.as_deref().map(UserId::parse).transpose())?;
        let priority = request
            .priority
            .try_map(|raw| raw.as_deref().map(TaskPriority::try_from).transpose())
            .map_err(BoardDomainError::from)?;
        let patch = TaskPatch {
            name: request.name,
            content: request.content,
            assignee,
            priority,
            due_date: request.due_date,
            comments: request.comments,
            attachments: request.attachments,
        };

        let current = self.find_project_or_error(project_id).await?;
        current.ensure_active()?;
        if let Some(Some(user_id)) = patch.assignee.as_set() {
            self.ensure_assignee_is_member(current.workspace_id(), *user_id)
                .await?;
        }

        let (saved, ()) = self
            .commit(current, |project, clock| {
                project.edit_board(clock, |board| board.update_task(task_id, patch.clone(), clock))
            })
            .await?;
        Ok(saved)
    }

    /// Deactivates a task and removes it from every column.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`BoardDomainError::TaskNotFound`] when no active
    /// task has the identifier, including one already deactivated.
    pub async fn deactivate_task(&self, project_ref: &str, task_ref: &str) -> BoardServiceResult<()> {
        let project_id = ProjectId::parse(project_ref)?;
        let task_id = TaskId::parse(task_ref)?;
        let current = self.find_project_or_error(project_id).await?;
        self.commit(current, |project, clock| {
            project.edit_board(clock, |board| board.deactivate_task(task_id, clock))
        })
        .await?;
        tracing::debug!(project_id = %project_id, task_id = %task_id, "Task deactivated");
        Ok(())
    }

    /// Moves a task reference from one column to the end of another.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`BoardDomainError`] when either column is missing
    /// or the source column does not hold the task.
    pub async fn move_task(&self, request: MoveTaskRequest) -> BoardServiceResult<Project> {
        let project_id = ProjectId::parse(&request.project_id)?;
        let task_id = TaskId::parse(&request.task_id)?;
        let source_id = ColumnId::parse(&request.source_column_id)?;
        let destination_id = ColumnId::parse(&request.destination_column_id)?;

        let current = self.find_project_or_error(project_id).await?;
        let (saved, ()) = self
            .commit(current, |project, clock| {
                project.edit_board(clock, |board| {
                    board.move_task(task_id, source_id, destination_id)
                })
            })
            .await?;
        Ok(saved)
    }

    /// Returns active tasks that no column references, such as the tasks of
    /// a column deleted without a destination.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::ProjectNotFound`] when absent.
    pub async fn unassigned_tasks(&self, project_ref: &str) -> BoardServiceResult<Vec<Task>> {
        let project = self.get_project(project_ref).await?;
        Ok(project
            .board()
            .unassigned_tasks()
            .into_iter()
            .cloned()
            .collect())
    }
}

fn parse_all<T>(
    raw_ids: &[String],
    parse: fn(&str) -> Result<T, IdentifierError>,
) -> Result<Vec<T>, IdentifierError> {
    raw_ids.iter().map(|raw| parse(raw)).collect()
}
