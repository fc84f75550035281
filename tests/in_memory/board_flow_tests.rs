//! In-memory integration tests for board operations.

use super::helpers::{Services, column_id, ordered_titles, reference_count, services};
use rstest::rstest;
use taskboard::board::services::{
    AddColumnRequest, AddTaskRequest, DeleteColumnRequest, MoveTaskRequest,
    ReorderColumnsRequest, UpdateTaskRequest,
};
use taskboard::shared::ErrorKind;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_travels_across_the_default_board(services: Services) -> Result<(), eyre::Report> {
    let (project, admin) = services.project("Roadmap").await?;
    let project_ref = project.id().to_string();
    let todo = column_id(&project, "To Do")?;
    let in_progress = column_id(&project, "In Progress")?;
    let done = column_id(&project, "Done")?;

    let added = services
        .boards
        .add_task(
            AddTaskRequest::new(&project_ref, todo.to_string(), "Publish release")
                .with_assignee(admin.to_string())
                .with_priority("Medium"),
        )
        .await?;
    let task_ref = added.task_id.to_string();
    services
        .boards
        .move_task(MoveTaskRequest::new(
            &project_ref,
            &task_ref,
            todo.to_string(),
            in_progress.to_string(),
        ))
        .await?;
    let finished = services
        .boards
        .move_task(MoveTaskRequest::new(
            &project_ref,
            &task_ref,
            in_progress.to_string(),
            done.to_string(),
        ))
        .await?;

    let board = finished.board();
    eyre::ensure!(
        board
            .column_containing(added.task_id)
            .map(taskboard::board::domain::Column::id)
            == Some(done),
        "task should end in Done"
    );
    eyre::ensure!(reference_count(&finished) == 1, "exactly one reference expected");
    let task = board
        .active_task(added.task_id)
        .ok_or_else(|| eyre::eyre!("task should stay active"))?;
    eyre::ensure!(task.assignee() == Some(admin), "assignee must survive moves");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_order_stays_a_permutation(services: Services) -> Result<(), eyre::Report> {
    let (project, _) = services.project("Roadmap").await?;
    let project_ref = project.id().to_string();

    let with_review = services
        .boards
        .add_column(AddColumnRequest::new(&project_ref, "Review"))
        .await?;
    eyre::ensure!(
        ordered_titles(&with_review) == ["To Do", "In Progress", "Done", "Review"],
        "new column is appended to the order"
    );

    let review = column_id(&with_review, "Review")?;
    let done = column_id(&with_review, "Done")?;
    let todo = column_id(&with_review, "To Do")?;
    let in_progress = column_id(&with_review, "In Progress")?;
    let reordered = services
        .boards
        .reorder_columns(ReorderColumnsRequest::new(
            &project_ref,
            [todo, in_progress, review, done].map(|id| id.to_string()),
        ))
        .await?;
    eyre::ensure!(reordered.board().order_is_consistent(), "order drifted");

    let removed = services
        .boards
        .delete_column(DeleteColumnRequest::new(&project_ref, in_progress.to_string()))
        .await?;
    eyre::ensure!(removed.id() == in_progress, "wrong column removed");

    let stored = services.boards.get_project(&project_ref).await?;
    eyre::ensure!(stored.board().order_is_consistent(), "order drifted");
    eyre::ensure!(
        ordered_titles(&stored) == ["To Do", "Review", "Done"],
        "unexpected order {:?}",
        ordered_titles(&stored)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_operations_leave_the_project_untouched(
    services: Services,
) -> Result<(), eyre::Report> {
    let (project, _) = services.project("Roadmap").await?;
    let project_ref = project.id().to_string();
    let todo = column_id(&project, "To Do")?;
    let done = column_id(&project, "Done")?;
    let added = services
        .boards
        .add_task(AddTaskRequest::new(&project_ref, todo.to_string(), "Only task"))
        .await?;
    let before = services.boards.get_project(&project_ref).await?;

    let wrong_source = services
        .boards
        .move_task(MoveTaskRequest::new(
            &project_ref,
            added.task_id.to_string(),
            done.to_string(),
            todo.to_string(),
        ))
        .await;
    let blank_name = services
        .boards
        .update_task(
            UpdateTaskRequest::new(&project_ref, added.task_id.to_string()).with_name("  "),
        )
        .await;
    let bad_reference = services
        .boards
        .add_task(AddTaskRequest::new(&project_ref, "column-7", "Nowhere"))
        .await;

    eyre::ensure!(
        wrong_source.err().map(|err| err.kind()) == Some(ErrorKind::NotFound),
        "moving from the wrong column is a not-found error"
    );
    eyre::ensure!(
        blank_name.err().map(|err| err.kind()) == Some(ErrorKind::Validation),
        "blank task names are rejected"
    );
    eyre::ensure!(
        bad_reference.err().map(|err| err.kind()) == Some(ErrorKind::Validation),
        "malformed column references are rejected"
    );
    let after = services.boards.get_project(&project_ref).await?;
    eyre::ensure!(after == before, "project changed after failed operations");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_moves_keep_reference_count(services: Services) -> Result<(), eyre::Report> {
    let (project, _) = services.project("Roadmap").await?;
    let project_ref = project.id().to_string();
    let todo = column_id(&project, "To Do")?;
    let done = column_id(&project, "Done")?;

    let mut task_ids = Vec::new();
    for name in ["One", "Two", "Three"] {
        let added = services
            .boards
            .add_task(AddTaskRequest::new(&project_ref, todo.to_string(), name))
            .await?;
        task_ids.push(added.task_id);
    }

    for task_id in &task_ids {
        let moved = services
            .boards
            .move_task(MoveTaskRequest::new(
                &project_ref,
                task_id.to_string(),
                todo.to_string(),
                done.to_string(),
            ))
            .await?;
        eyre::ensure!(reference_count(&moved) == 3, "move changed the reference count");
    }

    let stored = services.boards.get_project(&project_ref).await?;
    let done_column = stored
        .board()
        .column(done)
        .ok_or_else(|| eyre::eyre!("Done column missing"))?;
    eyre::ensure!(done_column.task_ids() == task_ids.as_slice(), "moves keep arrival order");
    Ok(())
}
