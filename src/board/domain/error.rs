//! Error types for board domain validation and invariant checks.

use crate::shared::{ColumnId, ErrorKind, ProjectId, TaskId};
use thiserror::Error;

/// Errors returned by board and project domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The column title is empty after trimming.
    #[error("column title must not be empty")]
    EmptyColumnTitle,

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The priority value is not one of the supported levels.
    #[error(transparent)]
    InvalidPriority(#[from] ParseTaskPriorityError),

    /// The column does not exist in the project.
    #[error("column {0} not found in the project")]
    ColumnNotFound(ColumnId),

    /// The task does not exist in the project or is no longer active.
    #[error("task {0} not found in the project")]
    TaskNotFound(TaskId),

    /// The task is not referenced by the expected column.
    #[error("task {task_id} not found in column {column_id}")]
    TaskNotInColumn {
        /// Task that was expected in the column.
        task_id: TaskId,
        /// Column that was searched.
        column_id: ColumnId,
    },

    /// A replacement column order is not a permutation of the existing
    /// columns.
    #[error("one or more columns not found")]
    ColumnSetMismatch,

    /// Tasks of a removed column cannot be reassigned to that same column.
    #[error("column {0} cannot receive its own tasks while being deleted")]
    ReassignToRemovedColumn(ColumnId),

    /// The project has been deactivated and no longer accepts changes.
    #[error("project {0} is deactivated")]
    ProjectInactive(ProjectId),
}

impl BoardDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyProjectName
            | Self::EmptyColumnTitle
            | Self::EmptyTaskName
            | Self::InvalidPriority(_)
            | Self::ReassignToRemovedColumn(_) => ErrorKind::Validation,
            Self::ColumnNotFound(_)
            | Self::TaskNotFound(_)
            | Self::TaskNotInColumn { .. }
            | Self::ColumnSetMismatch => ErrorKind::NotFound,
            Self::ProjectInactive(_) => ErrorKind::Conflict,
        }
    }
}

/// Error returned while parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid priority '{0}', allowed values are: Low, Medium, High")]
pub struct ParseTaskPriorityError(pub String);
