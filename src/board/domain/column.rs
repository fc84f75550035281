//! Column entity: a named bucket of task references.

use super::BoardDomainError;
use crate::shared::{ColumnId, Patch, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partial update of a column. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    /// New column title.
    pub title: Patch<String>,
    /// Replacement task reference list. Trusted as supplied.
    pub task_ids: Patch<Vec<TaskId>>,
}

/// A board column holding ordered references to project tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    title: String,
    task_ids: Vec<TaskId>,
    is_active: bool,
    deactivated_at: Option<DateTime<Utc>>,
}

impl Column {
    /// Creates an empty column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            id: ColumnId::new(),
            title: normalize_title(title.into())?,
            task_ids: Vec::new(),
            is_active: true,
            deactivated_at: None,
        })
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the column title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the ordered task references.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Returns whether the column is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the column was deactivated.
    #[must_use]
    pub const fn deactivated_at(&self) -> Option<DateTime<Utc>> {
        self.deactivated_at
    }

    /// Returns whether the column references the task.
    #[must_use]
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.task_ids.contains(&task_id)
    }

    pub(super) fn push_task(&mut self, task_id: TaskId) {
        self.task_ids.push(task_id);
    }

    pub(super) fn extend_tasks(&mut self, task_ids: &[TaskId]) {
        self.task_ids.extend_from_slice(task_ids);
    }

    /// Removes every reference to the task. Returns whether any was found.
    pub(super) fn remove_task(&mut self, task_id: TaskId) -> bool {
        let before = self.task_ids.len();
        self.task_ids.retain(|id| *id != task_id);
        self.task_ids.len() != before
    }

    pub(super) fn apply_patch(&mut self, patch: ColumnPatch) -> Result<(), BoardDomainError> {
        let ColumnPatch { title, task_ids } = patch;
        let validated_title = title.try_map(normalize_title)?;
        validated_title.apply_to(&mut self.title);
        task_ids.apply_to(&mut self.task_ids);
        Ok(())
    }
}

fn normalize_title(title: String) -> Result<String, BoardDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyColumnTitle);
    }
    Ok(trimmed.to_owned())
}
