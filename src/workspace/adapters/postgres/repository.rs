//! `PostgreSQL` repository implementation for workspace aggregates.

use super::{
    models::{NewWorkspaceRow, WorkspaceRow},
    schema::workspaces,
};
use crate::shared::{Revision, UserId, WorkspaceId};
use crate::workspace::{
    domain::Workspace,
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;

/// `PostgreSQL` connection pool type used by workspace adapters.
pub type WorkspacePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed workspace repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkspaceRepository {
    pool: WorkspacePgPool,
}

impl PostgresWorkspaceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkspacePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkspaceRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkspaceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(WorkspaceRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkspaceRepositoryError::persistence)?
    }
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    async fn store(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let workspace_id = workspace.id();
        let name = workspace.name().to_owned();
        let new_row = to_new_row(workspace)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(workspaces::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, workspace_id, &name))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<Revision> {
        let workspace_id = workspace.id();
        let name = workspace.name().to_owned();
        let expected = workspace.revision();
        let next = expected.next();
        let expected_value = revision_to_column(expected)?;
        let next_value = revision_to_column(next)?;
        let updated_at = workspace.updated_at();

        let mut saved = workspace.clone();
        saved.record_revision(next);
        let document =
            serde_json::to_value(&saved).map_err(WorkspaceRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                workspaces::table
                    .filter(workspaces::id.eq(workspace_id.into_inner()))
                    .filter(workspaces::revision.eq(expected_value)),
            )
            .set((
                workspaces::name.eq(&name),
                workspaces::document.eq(document),
                workspaces::revision.eq(next_value),
                workspaces::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(|err| map_unique_violation(err, workspace_id, &name))?;

            if affected == 1 {
                return Ok(next);
            }

            let stored_revision = workspaces::table
                .filter(workspaces::id.eq(workspace_id.into_inner()))
                .select(workspaces::revision)
                .first::<i64>(connection)
                .optional()
                .map_err(WorkspaceRepositoryError::persistence)?;

            match stored_revision {
                None => Err(WorkspaceRepositoryError::NotFound(workspace_id)),
                Some(actual) => Err(WorkspaceRepositoryError::RevisionConflict {
                    id: workspace_id,
                    expected,
                    actual: revision_from_column(actual)?,
                }),
            }
        })
        .await
    }

    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        self.run_blocking(move |connection| {
            let row = workspaces::table
                .filter(workspaces::id.eq(id.into_inner()))
                .select(WorkspaceRow::as_select())
                .first::<WorkspaceRow>(connection)
                .optional()
                .map_err(WorkspaceRepositoryError::persistence)?;
            row.map(row_to_workspace).transpose()
        })
        .await
    }

    async fn find_by_name(&self, name: &str) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let lookup_name = name.to_owned();
        self.run_blocking(move |connection| {
            let row = workspaces::table
                .filter(workspaces::name.eq(&lookup_name))
                .select(WorkspaceRow::as_select())
                .first::<WorkspaceRow>(connection)
                .optional()
                .map_err(WorkspaceRepositoryError::persistence)?;
            row.map(row_to_workspace).transpose()
        })
        .await
    }

    async fn find_by_member(&self, user_id: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        let membership = json!([{ "user_id": user_id, "is_active": true }]);
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(concat!(
                "SELECT id, name, revision, document ",
                "FROM workspaces ",
                "WHERE document->'members' @> $1 ",
                "ORDER BY created_at ASC",
            ))
            .bind::<diesel::sql_types::Jsonb, _>(membership)
            .load::<WorkspaceRow>(connection)
            .map_err(WorkspaceRepositoryError::persistence)?;
            rows.into_iter().map(row_to_workspace).collect()
        })
        .await
    }
}

fn map_unique_violation(
    err: DieselError,
    workspace_id: WorkspaceId,
    name: &str,
) -> WorkspaceRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_name_unique_violation(info.as_ref()) =>
        {
            WorkspaceRepositoryError::DuplicateName(name.to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            WorkspaceRepositoryError::DuplicateWorkspace(workspace_id)
        }
        _ => WorkspaceRepositoryError::persistence(err),
    }
}

fn is_name_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_workspaces_name_unique")
}

fn revision_to_column(revision: Revision) -> WorkspaceRepositoryResult<i64> {
    i64::try_from(revision.value()).map_err(WorkspaceRepositoryError::persistence)
}

fn revision_from_column(value: i64) -> WorkspaceRepositoryResult<Revision> {
    u64::try_from(value)
        .map(Revision::from_value)
        .map_err(WorkspaceRepositoryError::persistence)
}

fn to_new_row(workspace: &Workspace) -> WorkspaceRepositoryResult<NewWorkspaceRow> {
    let document =
        serde_json::to_value(workspace).map_err(WorkspaceRepositoryError::persistence)?;

    Ok(NewWorkspaceRow {
        id: workspace.id().into_inner(),
        name: workspace.name().to_owned(),
        revision: revision_to_column(workspace.revision())?,
        document,
        created_at: workspace.created_at(),
        updated_at: workspace.updated_at(),
    })
}

/// A key column disagrees with the value stored in the row's document.
#[derive(Debug, Error)]
#[error("workspace column `{column}` holds {column_value} but the document holds {document_value}")]
struct ColumnMismatch {
    column: &'static str,
    column_value: String,
    document_value: String,
}

fn ensure_column_matches<T>(
    column: &'static str,
    column_value: &T,
    document_value: &T,
) -> WorkspaceRepositoryResult<()>
where
    T: PartialEq + Display + ?Sized,
{
    if column_value == document_value {
        return Ok(());
    }
    Err(WorkspaceRepositoryError::persistence(ColumnMismatch {
        column,
        column_value: column_value.to_string(),
        document_value: document_value.to_string(),
    }))
}

fn row_to_workspace(row: WorkspaceRow) -> WorkspaceRepositoryResult<Workspace> {
    let WorkspaceRow {
        id,
        name,
        revision,
        document,
    } = row;
    let mut workspace = serde_json::from_value::<Workspace>(document)
        .map_err(WorkspaceRepositoryError::persistence)?;
    ensure_column_matches("id", &id, &workspace.id().into_inner())?;
    ensure_column_matches("name", name.as_str(), workspace.name())?;
    workspace.record_revision(revision_from_column(revision)?);
    Ok(workspace)
}
