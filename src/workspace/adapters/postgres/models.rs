//! Diesel row models for workspace persistence.

use super::schema::workspaces;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for workspace records.
///
/// Timestamps live inside the document, so only the key columns are read.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkspaceRow {
    /// Workspace identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Unique workspace name.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub name: String,
    /// Optimistic concurrency revision.
    #[diesel(sql_type = diesel::sql_types::Int8)]
    pub revision: i64,
    /// Serialized aggregate.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub document: Value,
}

/// Insert model for workspace records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workspaces)]
pub struct NewWorkspaceRow {
    /// Workspace identifier.
    pub id: uuid::Uuid,
    /// Unique workspace name.
    pub name: String,
    /// Initial revision.
    pub revision: i64,
    /// Serialized aggregate.
    pub document: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
