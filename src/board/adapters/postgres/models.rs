//! Diesel row models for project persistence.

use super::schema::projects;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for project records.
///
/// Timestamps live inside the document, so only the key columns are read.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Owning workspace identifier.
    pub workspace_id: uuid::Uuid,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Serialized aggregate.
    pub document: Value,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Owning workspace identifier.
    pub workspace_id: uuid::Uuid,
    /// Initial revision.
    pub revision: i64,
    /// Serialized aggregate.
    pub document: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
