//! Shared world state for kanban board BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Column, Project},
    services::{BoardServiceError, ProjectBoardService},
};
use taskboard::config::BoardConfig;
use taskboard::shared::{ColumnId, TaskId, UserId, WorkspaceId};
use taskboard::workspace::{
    adapters::memory::{InMemoryUserDirectory, InMemoryWorkspaceRepository},
    services::WorkspaceService,
};

/// Workspace service type used by the BDD world.
pub type TestWorkspaces =
    WorkspaceService<InMemoryWorkspaceRepository, InMemoryUserDirectory, DefaultClock>;

/// Board service type used by the BDD world.
pub type TestBoards = ProjectBoardService<InMemoryProjectRepository, TestWorkspaces, DefaultClock>;

/// Scenario world for kanban board behaviour tests.
pub struct BoardWorld {
    pub boards: TestBoards,
    pub workspaces: Arc<TestWorkspaces>,
    pub users: Arc<InMemoryUserDirectory>,
    pub workspace_id: Option<WorkspaceId>,
    pub admin: Option<UserId>,
    pub former_member: Option<UserId>,
    pub project: Option<Project>,
    pub last_task_id: Option<TaskId>,
    pub last_error: Option<BoardServiceError>,
}

impl BoardWorld {
    /// Creates a world with fresh in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserDirectory::new());
        let clock = Arc::new(DefaultClock);
        let workspaces = Arc::new(WorkspaceService::new(
            Arc::new(InMemoryWorkspaceRepository::new()),
            Arc::clone(&users),
            Arc::clone(&clock),
            BoardConfig::default(),
        ));
        let boards = ProjectBoardService::new(
            Arc::new(InMemoryProjectRepository::new()),
            Arc::clone(&workspaces),
            clock,
            BoardConfig::default(),
        );

        Self {
            boards,
            workspaces,
            users,
            workspace_id: None,
            admin: None,
            former_member: None,
            project: None,
            last_task_id: None,
            last_error: None,
        }
    }

    /// Returns the current project snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when no project has been created yet.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the raw identifier of the current project.
    ///
    /// # Errors
    ///
    /// Returns an error when no project has been created yet.
    pub fn project_ref(&self) -> Result<String, eyre::Report> {
        Ok(self.project()?.id().to_string())
    }

    /// Returns the most recently added task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been added yet.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.last_task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Finds a column of the current project by title.
    ///
    /// # Errors
    ///
    /// Returns an error when the project or the column is missing.
    pub fn column_id(&self, title: &str) -> Result<ColumnId, eyre::Report> {
        self.project()?
            .board()
            .columns()
            .iter()
            .find(|column| column.title() == title)
            .map(Column::id)
            .ok_or_else(|| eyre::eyre!("column {title} not found"))
    }

    /// Reloads the current project from the repository.
    ///
    /// # Errors
    ///
    /// Returns an error when the project cannot be loaded.
    pub fn refresh_project(&mut self) -> Result<&Project, eyre::Report> {
        let project_ref = self.project_ref()?;
        let project = run_async(self.boards.get_project(&project_ref))?;
        Ok(self.project.insert(project))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
