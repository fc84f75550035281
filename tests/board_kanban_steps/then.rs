//! Then steps for kanban board BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::then;
use taskboard::board::domain::Column;

#[then(r#"column "{column}" holds the task"#)]
fn column_holds_task(world: &BoardWorld, column: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let column_id = world.column_id(&column)?;
    let holder = world
        .project()?
        .board()
        .column_containing(task_id)
        .map(Column::id);

    if holder != Some(column_id) {
        return Err(eyre::eyre!("task {task_id} is not in column {column}"));
    }
    Ok(())
}

#[then(r#"column "{column}" is empty"#)]
fn column_is_empty(world: &BoardWorld, column: String) -> Result<(), eyre::Report> {
    let column_id = world.column_id(&column)?;
    let tasks = world
        .project()?
        .board()
        .column(column_id)
        .ok_or_else(|| eyre::eyre!("column {column} not found"))?
        .task_ids()
        .len();

    eyre::ensure!(tasks == 0, "column {column} still holds {tasks} tasks");
    Ok(())
}

#[then(r#"the request fails with a "{kind}" error"#)]
fn request_fails_with(world: &BoardWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the request to fail"))?;

    eyre::ensure!(
        err.kind().as_str() == kind,
        "expected a {kind} error, got {} ({err})",
        err.kind()
    );
    Ok(())
}

#[then("the project has no tasks")]
fn project_has_no_tasks(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let project = world.refresh_project()?;
    eyre::ensure!(
        project.board().tasks().is_empty(),
        "expected no tasks, found {}",
        project.board().tasks().len()
    );
    Ok(())
}

#[then(r#"the column order is "{titles}""#)]
fn column_order_is(world: &mut BoardWorld, titles: String) -> Result<(), eyre::Report> {
    let expected: Vec<&str> = titles.split(',').map(str::trim).collect();
    let project = world.refresh_project()?;
    let actual: Vec<&str> = project
        .board()
        .columns_in_order()
        .iter()
        .map(|column| column.title())
        .collect();

    eyre::ensure!(actual == expected, "expected order {expected:?}, got {actual:?}");
    eyre::ensure!(project.board().order_is_consistent(), "order drifted from columns");
    Ok(())
}

#[then("the task is unassigned")]
fn task_is_unassigned(world: &BoardWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let unassigned = run_async(world.boards.unassigned_tasks(&world.project_ref()?))?;

    eyre::ensure!(
        unassigned.iter().any(|task| task.id() == task_id),
        "task {task_id} should be unassigned"
    );
    Ok(())
}

#[then("no column references the task")]
fn no_column_references_task(world: &BoardWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let project = world.project()?;

    eyre::ensure!(
        project.board().column_containing(task_id).is_none(),
        "task {task_id} is still referenced"
    );
    let task = project
        .board()
        .task(task_id)
        .ok_or_else(|| eyre::eyre!("task {task_id} should be kept"))?;
    eyre::ensure!(!task.is_active(), "task {task_id} should be inactive");
    Ok(())
}

#[then(r#"deactivating the task again fails with a "{kind}" error"#)]
fn deactivating_again_fails(world: &BoardWorld, kind: String) -> Result<(), eyre::Report> {
    let project_ref = world.project_ref()?;
    let task_ref = world.task_id()?.to_string();
    let result = run_async(world.boards.deactivate_task(&project_ref, &task_ref));

    let Err(err) = result else {
        eyre::bail!("second deactivation should fail");
    };
    eyre::ensure!(err.kind().as_str() == kind, "expected {kind}, got {}", err.kind());
    Ok(())
}
