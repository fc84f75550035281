//! `PostgreSQL` repository implementation for project aggregates.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::board::{
    domain::Project,
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::shared::{ProjectId, Revision, WorkspaceId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::fmt::Display;
use thiserror::Error;

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<Revision> {
        let project_id = project.id();
        let expected = project.revision();
        let next = expected.next();
        let expected_value = revision_to_column(expected)?;
        let next_value = revision_to_column(next)?;
        let updated_at = project.updated_at();

        let mut saved = project.clone();
        saved.record_revision(next);
        let document = serde_json::to_value(&saved).map_err(ProjectRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                projects::table
                    .filter(projects::id.eq(project_id.into_inner()))
                    .filter(projects::revision.eq(expected_value)),
            )
            .set((
                projects::document.eq(document),
                projects::revision.eq(next_value),
                projects::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;

            if affected == 1 {
                return Ok(next);
            }

            let stored_revision = projects::table
                .filter(projects::id.eq(project_id.into_inner()))
                .select(projects::revision)
                .first::<i64>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;

            match stored_revision {
                None => Err(ProjectRepositoryError::NotFound(project_id)),
                Some(actual) => Err(ProjectRepositoryError::RevisionConflict {
                    id: project_id,
                    expected,
                    actual: revision_from_column(actual)?,
                }),
            }
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn find_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .filter(projects::workspace_id.eq(workspace_id.into_inner()))
                .order(projects::created_at.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }
}

fn revision_to_column(revision: Revision) -> ProjectRepositoryResult<i64> {
    i64::try_from(revision.value()).map_err(ProjectRepositoryError::persistence)
}

fn revision_from_column(value: i64) -> ProjectRepositoryResult<Revision> {
    u64::try_from(value)
        .map(Revision::from_value)
        .map_err(ProjectRepositoryError::persistence)
}

pub(super) fn to_new_row(project: &Project) -> ProjectRepositoryResult<NewProjectRow> {
    let document = serde_json::to_value(project).map_err(ProjectRepositoryError::persistence)?;

    Ok(NewProjectRow {
        id: project.id().into_inner(),
        workspace_id: project.workspace_id().into_inner(),
        revision: revision_to_column(project.revision())?,
        document,
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    })
}

/// A key column disagrees with the value stored in the row's document.
#[derive(Debug, Error)]
#[error("project column `{column}` holds {column_value} but the document holds {document_value}")]
struct ColumnMismatch {
    column: &'static str,
    column_value: String,
    document_value: String,
}

fn ensure_column_matches<T>(
    column: &'static str,
    column_value: &T,
    document_value: &T,
) -> ProjectRepositoryResult<()>
where
    T: PartialEq + Display + ?Sized,
{
    if column_value == document_value {
        return Ok(());
    }
    Err(ProjectRepositoryError::persistence(ColumnMismatch {
        column,
        column_value: column_value.to_string(),
        document_value: document_value.to_string(),
    }))
}

pub(super) fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        workspace_id,
        revision,
        document,
    } = row;
    let mut project =
        serde_json::from_value::<Project>(document).map_err(ProjectRepositoryError::persistence)?;
    ensure_column_matches("id", &id, &project.id().into_inner())?;
    ensure_column_matches(
        "workspace_id",
        &workspace_id,
        &project.workspace_id().into_inner(),
    )?;
    project.record_revision(revision_from_column(revision)?);
    Ok(project)
}
