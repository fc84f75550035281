//! Workspace membership as seen by project boards.

use super::helpers::{Services, column_id, services};
use rstest::rstest;
use taskboard::board::services::{AddTaskRequest, BoardServiceError, CreateProjectRequest};
use taskboard::shared::ErrorKind;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_cannot_receive_new_tasks(services: Services) -> Result<(), eyre::Report> {
    let (project, _) = services.project("Roadmap").await?;
    let workspace_ref = project.workspace_id().to_string();
    let leaver = services.member_of(project.workspace_id()).await?;
    let todo = column_id(&project, "To Do")?;

    services
        .boards
        .add_task(
            AddTaskRequest::new(project.id().to_string(), todo.to_string(), "Before leaving")
                .with_assignee(leaver.to_string()),
        )
        .await?;
    services
        .workspaces
        .deactivate_member(&workspace_ref, &leaver.to_string())
        .await?;

    let result = services
        .boards
        .add_task(
            AddTaskRequest::new(project.id().to_string(), todo.to_string(), "After leaving")
                .with_assignee(leaver.to_string()),
        )
        .await;

    let Err(err) = result else {
        eyre::bail!("former member was assigned a task");
    };
    eyre::ensure!(
        matches!(err, BoardServiceError::AssigneeNotMember { user_id, .. } if user_id == leaver),
        "unexpected error {err:?}"
    );
    eyre::ensure!(err.kind() == ErrorKind::Conflict, "membership is a conflict");
    let stored = services.boards.get_project(&project.id().to_string()).await?;
    eyre::ensure!(stored.board().tasks().len() == 1, "rejected task was stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workspace_lists_its_projects(services: Services) -> Result<(), eyre::Report> {
    let (workspace_id, admin) = services.workspace("Engineering").await?;
    let mut created = Vec::new();
    for name in ["API", "Web"] {
        let project = services
            .boards
            .create_project(CreateProjectRequest::new(
                name,
                workspace_id.to_string(),
                admin.to_string(),
            ))
            .await?;
        created.push(project.id());
    }

    let workspace = services
        .workspaces
        .get_workspace(&workspace_id.to_string())
        .await?;
    let listed: Vec<_> = services
        .boards
        .list_workspace_projects(&workspace_id.to_string())
        .await?
        .iter()
        .map(taskboard::board::domain::Project::id)
        .collect();

    eyre::ensure!(workspace.projects() == created.as_slice(), "workspace links drifted");
    eyre::ensure!(listed == created, "listing should follow creation order");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivated_workspace_accepts_no_new_projects(
    services: Services,
) -> Result<(), eyre::Report> {
    let (workspace_id, admin) = services.workspace("Sunset").await?;
    let workspace_ref = workspace_id.to_string();
    services
        .workspaces
        .deactivate_workspace(&workspace_ref, &admin.to_string())
        .await?;

    let result = services
        .boards
        .create_project(CreateProjectRequest::new(
            "Too late",
            &workspace_ref,
            admin.to_string(),
        ))
        .await;

    eyre::ensure!(
        matches!(result, Err(BoardServiceError::CreatorNotMember { .. })),
        "inactive workspace must not accept projects"
    );
    Ok(())
}
