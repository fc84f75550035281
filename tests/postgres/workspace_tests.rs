//! Workspace repository tests against `PostgreSQL`.

use crate::postgres::helpers::{TestDatabase, database, workspace_named};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::shared::{Patch, Revision, UserId};
use taskboard::workspace::domain::{MemberRole, WorkspacePatch};
use taskboard::workspace::ports::{WorkspaceRepository, WorkspaceRepositoryError};

#[rstest]
fn rename_onto_existing_name_is_rejected(database: TestDatabase) {
    let owner = UserId::new();
    let alpha = workspace_named("Alpha", owner);
    let mut beta = workspace_named("Beta", owner);
    let rt = &database.rt;
    rt.block_on(database.workspaces.store(&alpha))
        .expect("alpha stored");
    rt.block_on(database.workspaces.store(&beta))
        .expect("beta stored");

    beta.apply_patch(
        WorkspacePatch {
            name: Patch::Set("Alpha".to_owned()),
            ..Default::default()
        },
        &DefaultClock,
    )
    .expect("rename is valid in isolation");
    let result = rt.block_on(database.workspaces.update(&beta));

    assert!(
        matches!(&result, Err(WorkspaceRepositoryError::DuplicateName(name)) if name == "Alpha"),
        "Expected DuplicateName, got: {result:?}"
    );
    let unchanged = rt
        .block_on(database.workspaces.find_by_name("Beta"))
        .expect("lookup succeeds")
        .expect("beta keeps its name");
    assert_eq!(unchanged.id(), beta.id());
    assert_eq!(unchanged.revision(), Revision::initial());
}

#[rstest]
fn store_with_taken_name_is_rejected(database: TestDatabase) {
    let first = workspace_named("Shared", UserId::new());
    let second = workspace_named("Shared", UserId::new());
    database
        .rt
        .block_on(database.workspaces.store(&first))
        .expect("first stored");

    let result = database.rt.block_on(database.workspaces.store(&second));

    assert!(
        matches!(&result, Err(WorkspaceRepositoryError::DuplicateName(name)) if name == "Shared"),
        "Expected DuplicateName, got: {result:?}"
    );
}

#[rstest]
fn stale_revision_update_is_rejected(database: TestDatabase) {
    let stored = workspace_named("Design", UserId::new());
    let rt = &database.rt;
    rt.block_on(database.workspaces.store(&stored))
        .expect("workspace stored");
    let saved = rt
        .block_on(database.workspaces.update(&stored))
        .expect("first writer wins");

    let result = rt.block_on(database.workspaces.update(&stored));

    assert!(
        matches!(
            result,
            Err(WorkspaceRepositoryError::RevisionConflict { id, expected, actual })
                if id == stored.id() && expected == Revision::initial() && actual == saved
        ),
        "Expected RevisionConflict, got: {result:?}"
    );
}

#[rstest]
fn find_by_member_skips_inactive_memberships(database: TestDatabase) {
    let user = UserId::new();
    let owned = workspace_named("Owned", user);
    let mut joined = workspace_named("Joined", UserId::new());
    joined
        .add_member(user, MemberRole::Member, &DefaultClock)
        .expect("user joins");
    let mut left = workspace_named("Left", UserId::new());
    left.add_member(user, MemberRole::Member, &DefaultClock)
        .expect("user joins");
    left.deactivate_member(user, &DefaultClock)
        .expect("user leaves");
    let unrelated = workspace_named("Unrelated", UserId::new());

    let rt = &database.rt;
    for candidate in [&owned, &joined, &left, &unrelated] {
        rt.block_on(database.workspaces.store(candidate))
            .expect("workspace stored");
    }

    let names: Vec<String> = rt
        .block_on(database.workspaces.find_by_member(user))
        .expect("lookup succeeds")
        .iter()
        .map(|found| found.name().to_owned())
        .collect();

    assert_eq!(names, ["Owned", "Joined"]);
}
