//! Kanban board: columns, display order and the flat task list.
//!
//! Invariants maintained by every mutation:
//!
//! - `order` is a permutation of the identifiers in `columns`.
//! - A task is referenced by at most one column at a time through
//!   [`Board::add_task`] and [`Board::move_task`].
//! - After [`Board::deactivate_task`] no column references the task.
//!
//! Deleting a column without a reassignment target leaves its tasks in the
//! flat list with no column referencing them; [`Board::unassigned_tasks`]
//! reports those.

use super::{BoardDomainError, Column, ColumnPatch, Task, TaskDraft, TaskPatch};
use crate::shared::{ColumnId, TaskId};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Board embedded in a project aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    columns: Vec<Column>,
    order: Vec<ColumnId>,
    tasks: Vec<Task>,
}

impl Board {
    /// Creates a board with one empty column per title, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnTitle`] if any title is blank.
    pub fn with_columns<I, S>(titles: I) -> Result<Self, BoardDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut board = Self::default();
        for title in titles {
            board.add_column(title)?;
        }
        Ok(board)
    }

    /// Returns the columns in storage order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the display order of column identifiers.
    #[must_use]
    pub fn order(&self) -> &[ColumnId] {
        &self.order
    }

    /// Returns every task, active or not.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the columns following the display order.
    #[must_use]
    pub fn columns_in_order(&self) -> Vec<&Column> {
        self.order
            .iter()
            .filter_map(|column_id| self.column(*column_id))
            .collect()
    }

    /// Finds a column by identifier.
    #[must_use]
    pub fn column(&self, column_id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == column_id)
    }

    /// Finds a task by identifier regardless of its activation state.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Finds an active task by identifier.
    #[must_use]
    pub fn active_task(&self, task_id: TaskId) -> Option<&Task> {
        self.task(task_id).filter(|task| task.is_active())
    }

    /// Returns the column currently referencing the task, if any.
    #[must_use]
    pub fn column_containing(&self, task_id: TaskId) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.contains_task(task_id))
    }

    /// Returns active tasks that no column references.
    #[must_use]
    pub fn unassigned_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.is_active() && self.column_containing(task.id()).is_none())
            .collect()
    }

    /// Returns column references that do not resolve to an active task.
    #[must_use]
    pub fn dangling_task_refs(&self) -> Vec<(ColumnId, TaskId)> {
        let mut dangling = Vec::new();
        for column in &self.columns {
            for task_id in column.task_ids() {
                if self.active_task(*task_id).is_none() {
                    dangling.push((column.id(), *task_id));
                }
            }
        }
        dangling
    }

    /// Returns whether `order` is exactly a permutation of the column
    /// identifiers.
    #[must_use]
    pub fn order_is_consistent(&self) -> bool {
        is_permutation_of_columns(&self.columns, &self.order)
    }

    /// Appends a new empty column to both the column list and `order`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnTitle`] when the title is blank.
    pub fn add_column(&mut self, title: impl Into<String>) -> Result<ColumnId, BoardDomainError> {
        let column = Column::new(title)?;
        let column_id = column.id();
        self.columns.push(column);
        self.order.push(column_id);
        Ok(column_id)
    }

    /// Applies a partial update to a column.
    ///
    /// A supplied `task_ids` list replaces the column's references as given;
    /// callers can inspect [`Board::dangling_task_refs`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] or a title validation
    /// error.
    pub fn update_column(
        &mut self,
        column_id: ColumnId,
        patch: ColumnPatch,
    ) -> Result<(), BoardDomainError> {
        self.column_mut(column_id)?.apply_patch(patch)
    }

    /// Removes a column from the column list and from `order`.
    ///
    /// With `reassign_to` set, the removed column's task references are
    /// appended to that column; otherwise those tasks become unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] when either column is
    /// missing, or [`BoardDomainError::ReassignToRemovedColumn`] when the
    /// target is the column being removed.
    pub fn remove_column(
        &mut self,
        column_id: ColumnId,
        reassign_to: Option<ColumnId>,
    ) -> Result<Column, BoardDomainError> {
        let position = self
            .columns
            .iter()
            .position(|column| column.id() == column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))?;

        if let Some(target_id) = reassign_to {
            if target_id == column_id {
                return Err(BoardDomainError::ReassignToRemovedColumn(column_id));
            }
            if self.column(target_id).is_none() {
                return Err(BoardDomainError::ColumnNotFound(target_id));
            }
        }

        let removed = self.columns.remove(position);
        self.order.retain(|id| *id != column_id);

        if let Some(target_id) = reassign_to {
            self.column_mut(target_id)?
                .extend_tasks(removed.task_ids());
        }
        Ok(removed)
    }

    /// Replaces `order` with a permutation of the existing column identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnSetMismatch`] when an existing column
    /// is missing, a foreign identifier is present, or an identifier repeats.
    /// The board is unchanged on error.
    pub fn reorder_columns(&mut self, new_order: Vec<ColumnId>) -> Result<(), BoardDomainError> {
        if !is_permutation_of_columns(&self.columns, &new_order) {
            return Err(BoardDomainError::ColumnSetMismatch);
        }
        self.order = new_order;
        Ok(())
    }

    /// Creates a task in the flat list and references it from the column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] before anything is added
    /// when the column does not exist.
    pub fn add_task(
        &mut self,
        column_id: ColumnId,
        draft: TaskDraft,
        clock: &impl Clock,
    ) -> Result<TaskId, BoardDomainError> {
        let column = self.column_mut(column_id)?;
        let task = Task::new(draft, clock);
        let task_id = task.id();
        column.push_task(task_id);
        self.tasks.push(task);
        Ok(task_id)
    }

    /// Applies a partial update to an active task. Column membership is not
    /// affected.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TaskNotFound`] when no active task has the
    /// identifier, or a field validation error.
    pub fn update_task(
        &mut self,
        task_id: TaskId,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.active_task_mut(task_id)?.apply_patch(patch, clock)
    }

    /// Deactivates a task and strips its identifier from every column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TaskNotFound`] when no active task has the
    /// identifier, including a task that was already deactivated.
    pub fn deactivate_task(
        &mut self,
        task_id: TaskId,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.active_task_mut(task_id)?.deactivate(clock);
        for column in &mut self.columns {
            column.remove_task(task_id);
        }
        Ok(())
    }

    /// Moves a task reference from one column to the end of another.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] when either column is
    /// missing, or [`BoardDomainError::TaskNotInColumn`] when the source
    /// column does not reference the task.
    pub fn move_task(
        &mut self,
        task_id: TaskId,
        source_id: ColumnId,
        destination_id: ColumnId,
    ) -> Result<(), BoardDomainError> {
        let source = self
            .column(source_id)
            .ok_or(BoardDomainError::ColumnNotFound(source_id))?;
        if self.column(destination_id).is_none() {
            return Err(BoardDomainError::ColumnNotFound(destination_id));
        }
        if !source.contains_task(task_id) {
            return Err(BoardDomainError::TaskNotInColumn {
                task_id,
                column_id: source_id,
            });
        }

        self.column_mut(source_id)?.remove_task(task_id);
        self.column_mut(destination_id)?.push_task(task_id);
        Ok(())
    }

    fn column_mut(&mut self, column_id: ColumnId) -> Result<&mut Column, BoardDomainError> {
        self.columns
            .iter_mut()
            .find(|column| column.id() == column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))
    }

    fn active_task_mut(&mut self, task_id: TaskId) -> Result<&mut Task, BoardDomainError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == task_id && task.is_active())
            .ok_or(BoardDomainError::TaskNotFound(task_id))
    }
}

fn is_permutation_of_columns(columns: &[Column], candidate: &[ColumnId]) -> bool {
    if candidate.len() != columns.len() {
        return false;
    }
    let existing: HashSet<ColumnId> = columns.iter().map(Column::id).collect();
    let mut seen = HashSet::with_capacity(candidate.len());
    candidate
        .iter()
        .all(|column_id| existing.contains(column_id) && seen.insert(*column_id))
}
