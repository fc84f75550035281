//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use taskboard::board::{
    adapters::postgres::PostgresProjectRepository,
    domain::{Board, Project, ProjectDraft},
};
use taskboard::shared::UserId;
use taskboard::workspace::{
    adapters::postgres::PostgresWorkspaceRepository,
    domain::{Workspace, WorkspaceDraft},
};
use tokio::runtime::Runtime;

/// SQL creating the workspaces table.
pub const CREATE_WORKSPACES_SQL: &str =
    include_str!("../../migrations/2026-01-05-000000_create_workspaces/up.sql");

/// SQL creating the projects table.
pub const CREATE_PROJECTS_SQL: &str =
    include_str!("../../migrations/2026-01-05-000100_create_projects/up.sql");

/// Template database name for pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

/// Boxed error returned by fallible setup helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates a tokio runtime for driving the async repositories.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with both migrations applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_WORKSPACES_SQL)
                .map_err(|e| eyre::eyre!("SQL error: {e}"))?;
            conn.batch_execute(CREATE_PROJECTS_SQL)
                .map_err(|e| eyre::eyre!("SQL error: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Drops the per-test database once every repository pool is gone.
pub struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            tracing::warn!(database = %self.db_name, error = %err, "failed to drop test database");
        }
    }
}

/// Repositories backed by a fresh database cloned from the template.
///
/// Fields drop in declaration order, so the pools close before the guard
/// drops the database.
pub struct TestDatabase {
    /// Workspace repository.
    pub workspaces: PostgresWorkspaceRepository,
    /// Project repository sharing the workspace pool.
    pub projects: PostgresProjectRepository,
    /// Runtime driving the repository futures.
    pub rt: Runtime,
    _guard: CleanupGuard,
}

/// Provides a migrated database and repositories for one test.
#[fixture]
pub fn database(shared_test_cluster: &'static TestCluster) -> TestDatabase {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_{}", uuid::Uuid::new_v4().simple());
    shared_test_cluster
        .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
        .expect("database created from template");
    let guard = CleanupGuard {
        cluster: shared_test_cluster,
        db_name: db_name.clone(),
    };

    let url = shared_test_cluster.connection().database_url(&db_name);
    let pool = Pool::builder()
        .max_size(1)
        .build(ConnectionManager::<PgConnection>::new(url))
        .expect("connection pool");

    TestDatabase {
        workspaces: PostgresWorkspaceRepository::new(pool.clone()),
        projects: PostgresProjectRepository::new(pool),
        rt: test_runtime(),
        _guard: guard,
    }
}

/// Builds an unsaved workspace created by `creator`.
pub fn workspace_named(name: &str, creator: UserId) -> Workspace {
    let draft = WorkspaceDraft::new(name).expect("valid workspace draft");
    Workspace::new(draft, creator, &DefaultClock)
}

/// Builds an unsaved project with a two-column board inside `workspace`.
pub fn project_in(workspace: &Workspace, creator: UserId, name: &str) -> Project {
    let draft = ProjectDraft::new(name, workspace.id(), creator).expect("valid project draft");
    let board = Board::with_columns(["To Do", "Done"]).expect("valid board");
    Project::new(draft, board, &DefaultClock)
}
