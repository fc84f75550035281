//! Project repository tests against `PostgreSQL`.

use crate::postgres::helpers::{TestDatabase, database, project_in, workspace_named};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::board::domain::Column;
use taskboard::board::ports::{ProjectRepository, ProjectRepositoryError};
use taskboard::shared::{Revision, UserId};
use taskboard::workspace::ports::WorkspaceRepository;

#[rstest]
fn stale_revision_update_is_rejected(database: TestDatabase) {
    let owner = UserId::new();
    let workspace = workspace_named("Roadmap", owner);
    let project = project_in(&workspace, owner, "Launch");
    let rt = &database.rt;
    rt.block_on(database.workspaces.store(&workspace))
        .expect("workspace stored");
    rt.block_on(database.projects.store(&project))
        .expect("project stored");

    let mut first = rt
        .block_on(database.projects.find_by_id(project.id()))
        .expect("lookup succeeds")
        .expect("project exists");
    let mut second = first.clone();
    first
        .edit_board(&DefaultClock, |board| board.add_column("Review"))
        .expect("column added");
    second
        .edit_board(&DefaultClock, |board| board.add_column("Blocked"))
        .expect("column added");

    let saved = rt
        .block_on(database.projects.update(&first))
        .expect("first writer wins");
    assert_eq!(saved, Revision::initial().next());

    let result = rt.block_on(database.projects.update(&second));
    assert!(
        matches!(
            result,
            Err(ProjectRepositoryError::RevisionConflict { id, expected, actual })
                if id == project.id() && expected == Revision::initial() && actual == saved
        ),
        "Expected RevisionConflict, got: {result:?}"
    );

    let stored = rt
        .block_on(database.projects.find_by_id(project.id()))
        .expect("lookup succeeds")
        .expect("project exists");
    let titles: Vec<&str> = stored
        .board()
        .columns_in_order()
        .into_iter()
        .map(Column::title)
        .collect();
    assert_eq!(titles, ["To Do", "Done", "Review"]);
    assert_eq!(stored.revision(), saved);
}

#[rstest]
fn update_of_unsaved_project_reports_not_found(database: TestDatabase) {
    let owner = UserId::new();
    let workspace = workspace_named("Operations", owner);
    let project = project_in(&workspace, owner, "Never stored");
    database
        .rt
        .block_on(database.workspaces.store(&workspace))
        .expect("workspace stored");

    let result = database.rt.block_on(database.projects.update(&project));

    assert!(
        matches!(result, Err(ProjectRepositoryError::NotFound(id)) if id == project.id()),
        "Expected NotFound, got: {result:?}"
    );
}

#[rstest]
fn find_by_workspace_lists_only_that_workspace(database: TestDatabase) {
    let owner = UserId::new();
    let home = workspace_named("Home", owner);
    let elsewhere = workspace_named("Elsewhere", owner);
    let first = project_in(&home, owner, "First");
    let second = project_in(&home, owner, "Second");
    let foreign = project_in(&elsewhere, owner, "Foreign");
    let rt = &database.rt;
    for workspace in [&home, &elsewhere] {
        rt.block_on(database.workspaces.store(workspace))
            .expect("workspace stored");
    }
    for project in [&first, &second, &foreign] {
        rt.block_on(database.projects.store(project))
            .expect("project stored");
    }

    let names: Vec<String> = rt
        .block_on(database.projects.find_by_workspace(home.id()))
        .expect("listing succeeds")
        .iter()
        .map(|project| project.name().to_owned())
        .collect();

    assert_eq!(names, ["First", "Second"]);
}
