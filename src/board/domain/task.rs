//! Task entity owned by a project board.

use super::{BoardDomainError, ParseTaskPriorityError};
use crate::shared::{Patch, TaskId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Validated fields for a task that is about to be added to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    name: String,
    content: Option<String>,
    assignee: Option<UserId>,
    due_date: Option<NaiveDate>,
    priority: Option<TaskPriority>,
    comments: Vec<String>,
    attachments: Vec<String>,
    created_by: Option<UserId>,
}

impl TaskDraft {
    /// Creates a draft with the required task name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskName`] when the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            name: normalize_task_name(name.into())?,
            content: None,
            assignee: None,
            due_date: None,
            priority: None,
            comments: Vec::new(),
            attachments: Vec::new(),
            created_by: None,
        })
    }

    /// Sets free-text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets initial comments.
    #[must_use]
    pub fn with_comments(mut self, comments: impl IntoIterator<Item = String>) -> Self {
        self.comments = comments.into_iter().collect();
        self
    }

    /// Sets attachment references.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = String>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }

    /// Records the creating user.
    #[must_use]
    pub const fn with_created_by(mut self, user_id: UserId) -> Self {
        self.created_by = Some(user_id);
        self
    }

    /// Returns the requested assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }
}

/// Partial update of a task. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New task name.
    pub name: Patch<String>,
    /// New content, or `Set(None)` to clear it.
    pub content: Patch<Option<String>>,
    /// New assignee, or `Set(None)` to unassign.
    pub assignee: Patch<Option<UserId>>,
    /// New priority, or `Set(None)` to clear it.
    pub priority: Patch<Option<TaskPriority>>,
    /// New due date, or `Set(None)` to clear it.
    pub due_date: Patch<Option<NaiveDate>>,
    /// Replacement comment list.
    pub comments: Patch<Vec<String>>,
    /// Replacement attachment list.
    pub attachments: Patch<Vec<String>>,
}

impl TaskPatch {
    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.name.is_set()
            || self.content.is_set()
            || self.assignee.is_set()
            || self.priority.is_set()
            || self.due_date.is_set()
            || self.comments.is_set()
            || self.attachments.is_set())
    }
}

/// A unit of work on a project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    content: Option<String>,
    assignee: Option<UserId>,
    due_date: Option<NaiveDate>,
    priority: Option<TaskPriority>,
    comments: Vec<String>,
    attachments: Vec<String>,
    created_by: Option<UserId>,
    is_active: bool,
    deactivated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an active task from a draft.
    #[must_use]
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let TaskDraft {
            name,
            content,
            assignee,
            due_date,
            priority,
            comments,
            attachments,
            created_by,
        } = draft;

        Self {
            id: TaskId::new(),
            name,
            content,
            assignee,
            due_date,
            priority,
            comments,
            attachments,
            created_by,
            is_active: true,
            deactivated_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the free-text content.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the comments.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Returns the attachment references.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Returns the creating user, when recorded.
    #[must_use]
    pub const fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Returns whether the task is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the task was deactivated.
    #[must_use]
    pub const fn deactivated_at(&self) -> Option<DateTime<Utc>> {
        self.deactivated_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskName`] when the patch sets a blank
    /// name. No field is modified in that case.
    pub(crate) fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let TaskPatch {
            name,
            content,
            assignee,
            priority,
            due_date,
            comments,
            attachments,
        } = patch;
        let validated_name = name.try_map(normalize_task_name)?;

        let mut changed = validated_name.apply_to(&mut self.name);
        changed |= content.apply_to(&mut self.content);
        changed |= assignee.apply_to(&mut self.assignee);
        changed |= priority.apply_to(&mut self.priority);
        changed |= due_date.apply_to(&mut self.due_date);
        changed |= comments.apply_to(&mut self.comments);
        changed |= attachments.apply_to(&mut self.attachments);
        if changed {
            self.updated_at = clock.utc();
        }
        Ok(())
    }

    pub(crate) fn deactivate(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.is_active = false;
        self.deactivated_at = Some(timestamp);
        self.updated_at = timestamp;
    }
}

fn normalize_task_name(name: String) -> Result<String, BoardDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyTaskName);
    }
    Ok(trimmed.to_owned())
}
