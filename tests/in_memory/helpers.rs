//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use taskboard::board::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Column, Project},
    services::{CreateProjectRequest, ProjectBoardService},
};
use taskboard::config::BoardConfig;
use taskboard::shared::{ColumnId, UserId, WorkspaceId};
use taskboard::workspace::{
    adapters::memory::{InMemoryUserDirectory, InMemoryWorkspaceRepository},
    services::{AddMemberRequest, CreateWorkspaceRequest, WorkspaceService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Workspace service wired to in-memory adapters.
pub type TestWorkspaces =
    WorkspaceService<InMemoryWorkspaceRepository, InMemoryUserDirectory, DefaultClock>;

/// Board service wired to in-memory adapters and the workspace service.
pub type TestBoards = ProjectBoardService<InMemoryProjectRepository, TestWorkspaces, DefaultClock>;

/// Both services sharing one set of in-memory stores.
pub struct Services {
    /// Board service under test.
    pub boards: Arc<TestBoards>,
    /// Workspace service also used as the board's gateway.
    pub workspaces: Arc<TestWorkspaces>,
    /// User accounts known to the workspace service.
    pub users: Arc<InMemoryUserDirectory>,
}

/// Builds services with the given configuration.
#[must_use]
pub fn services_with(config: &BoardConfig) -> Services {
    let users = Arc::new(InMemoryUserDirectory::new());
    let clock = Arc::new(DefaultClock);
    let workspaces = Arc::new(WorkspaceService::new(
        Arc::new(InMemoryWorkspaceRepository::new()),
        Arc::clone(&users),
        Arc::clone(&clock),
        config.clone(),
    ));
    let boards = Arc::new(ProjectBoardService::new(
        Arc::new(InMemoryProjectRepository::new()),
        Arc::clone(&workspaces),
        clock,
        config.clone(),
    ));
    Services {
        boards,
        workspaces,
        users,
    }
}

/// Provides services with the default configuration.
#[fixture]
pub fn services() -> Services {
    services_with(&BoardConfig::default())
}

impl Services {
    /// Registers a fresh user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the user directory rejects the registration.
    pub fn register_user(&self) -> Result<UserId, eyre::Report> {
        Ok(self.users.register(UserId::new())?)
    }

    /// Creates a workspace administered by a fresh user.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace cannot be created.
    pub async fn workspace(&self, name: &str) -> Result<(WorkspaceId, UserId), eyre::Report> {
        let admin = self.register_user()?;
        let workspace = self
            .workspaces
            .create_workspace(CreateWorkspaceRequest::new(name, admin.to_string()))
            .await?;
        Ok((workspace.id(), admin))
    }

    /// Adds a fresh user to the workspace as a regular member.
    ///
    /// # Errors
    ///
    /// Returns an error if the member cannot be added.
    pub async fn member_of(&self, workspace_id: WorkspaceId) -> Result<UserId, eyre::Report> {
        let user_id = self.register_user()?;
        self.workspaces
            .add_member(AddMemberRequest::new(
                workspace_id.to_string(),
                user_id.to_string(),
            ))
            .await?;
        Ok(user_id)
    }

    /// Creates a workspace and a project with the default board in it.
    ///
    /// # Errors
    ///
    /// Returns an error if either aggregate cannot be created.
    pub async fn project(&self, name: &str) -> Result<(Project, UserId), eyre::Report> {
        let (workspace_id, admin) = self.workspace(&format!("{name} workspace")).await?;
        let project = self
            .boards
            .create_project(CreateProjectRequest::new(
                name,
                workspace_id.to_string(),
                admin.to_string(),
            ))
            .await?;
        Ok((project, admin))
    }
}

/// Finds a column by title.
///
/// # Errors
///
/// Returns an error if no column has the title.
pub fn column_id(project: &Project, title: &str) -> Result<ColumnId, eyre::Report> {
    project
        .board()
        .columns()
        .iter()
        .find(|column| column.title() == title)
        .map(Column::id)
        .ok_or_else(|| eyre::eyre!("column {title} not found"))
}

/// Returns column titles in display order.
#[must_use]
pub fn ordered_titles(project: &Project) -> Vec<String> {
    project
        .board()
        .columns_in_order()
        .iter()
        .map(|column| column.title().to_owned())
        .collect()
}

/// Counts task references across all columns.
#[must_use]
pub fn reference_count(project: &Project) -> usize {
    project
        .board()
        .columns()
        .iter()
        .map(|column| column.task_ids().len())
        .sum()
}
