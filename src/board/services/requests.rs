//! Request payloads accepted by [`super::ProjectBoardService`].
//!
//! Identifiers arrive as raw strings; the service parses them before any
//! repository access.

use crate::shared::Patch;
use chrono::NaiveDate;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,
    /// Raw identifier of the owning workspace.
    pub workspace_id: String,
    /// Raw identifier of the creating user.
    pub created_by: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Initial column titles; the configured defaults when absent or empty.
    pub columns: Option<Vec<String>>,
}

impl CreateProjectRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        workspace_id: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            workspace_id: workspace_id.into(),
            created_by: created_by.into(),
            description: None,
            image_url: None,
            columns: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Replaces the default columns.
    #[must_use]
    pub fn with_columns(mut self, titles: impl IntoIterator<Item = String>) -> Self {
        self.columns = Some(titles.into_iter().collect());
        self
    }
}

/// Request payload for a partial project metadata update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// New name.
    pub name: Patch<String>,
    /// New description, or `Set(None)` to clear it.
    pub description: Patch<Option<String>>,
    /// New image reference, or `Set(None)` to clear it.
    pub image_url: Patch<Option<String>>,
}

impl UpdateProjectRequest {
    /// Creates an update that changes nothing yet.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Renames the project.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Set(name.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Patch::Set(description);
        self
    }

    /// Replaces or clears the image reference.
    #[must_use]
    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = Patch::Set(image_url);
        self
    }
}

/// Request payload for appending a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumnRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// Column title.
    pub title: String,
}

impl AddColumnRequest {
    /// Creates the request.
    #[must_use]
    pub fn new(project_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
        }
    }
}

/// Request payload for a partial column update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateColumnRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// Raw column identifier.
    pub column_id: String,
    /// New title.
    pub title: Patch<String>,
    /// Replacement list of raw task identifiers, stored as supplied.
    pub task_ids: Patch<Vec<String>>,
}

impl UpdateColumnRequest {
    /// Creates an update that changes nothing yet.
    #[must_use]
    pub fn new(project_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            column_id: column_id.into(),
            ..Self::default()
        }
    }

    /// Renames the column.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Patch::Set(title.into());
        self
    }

    /// Overwrites the column's task references.
    #[must_use]
    pub fn with_task_ids(mut self, task_ids: impl IntoIterator<Item = String>) -> Self {
        self.task_ids = Patch::Set(task_ids.into_iter().collect());
        self
    }
}

/// Request payload for deleting a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteColumnRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// Raw identifier of the column to delete.
    pub column_id: String,
    /// Raw identifier of a column that receives the deleted column's tasks.
    /// Without one those tasks are left unassigned.
    pub reassign_to: Option<String>,
}

impl DeleteColumnRequest {
    /// Creates a request that leaves the column's tasks unassigned.
    #[must_use]
    pub fn new(project_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            column_id: column_id.into(),
            reassign_to: None,
        }
    }

    /// Moves the deleted column's tasks to another column.
    #[must_use]
    pub fn with_destination(mut self, column_id: impl Into<String>) -> Self {
        self.reassign_to = Some(column_id.into());
        self
    }
}

/// Request payload for replacing the column display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderColumnsRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// Raw column identifiers in the new display order.
    pub order: Vec<String>,
}

impl ReorderColumnsRequest {
    /// Creates the request.
    #[must_use]
    pub fn new(project_id: impl Into<String>, order: impl IntoIterator<Item = String>) -> Self {
        Self {
            project_id: project_id.into(),
            order: order.into_iter().collect(),
        }
    }
}

/// Request payload for adding a task to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTaskRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// Raw identifier of the receiving column.
    pub column_id: String,
    /// Task name.
    pub name: String,
    /// Free-text content.
    pub content: Option<String>,
    /// Raw identifier of the assignee.
    pub assignee: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Priority name (`Low`, `Medium`, `High`).
    pub priority: Option<String>,
    /// Initial comments.
    pub comments: Vec<String>,
    /// Attachment references.
    pub attachments: Vec<String>,
    /// Raw identifier of the creating user.
    pub created_by: Option<String>,
}

impl AddTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        column_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            column_id: column_id.into(),
            name: name.into(),
            content: None,
            assignee: None,
            due_date: None,
            priority: None,
            comments: Vec::new(),
            attachments: Vec::new(),
            created_by: None,
        }
    }

    /// Sets free-text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assignee = Some(user_id.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
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
    pub fn with_created_by(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = Some(user_id.into());
        self
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// Raw task identifier.
    pub task_id: String,
    /// New name.
    pub name: Patch<String>,
    /// New content, or `Set(None)` to clear it.
    pub content: Patch<Option<String>>,
    /// New raw assignee identifier, or `Set(None)` to unassign.
    pub assignee: Patch<Option<String>>,
    /// New priority name, or `Set(None)` to clear it.
    pub priority: Patch<Option<String>>,
    /// New due date, or `Set(None)` to clear it.
    pub due_date: Patch<Option<NaiveDate>>,
    /// Replacement comments.
    pub comments: Patch<Vec<String>>,
    /// Replacement attachment references.
    pub attachments: Patch<Vec<String>>,
}

impl UpdateTaskRequest {
    /// Creates an update that changes nothing yet.
    #[must_use]
    pub fn new(project_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            task_id: task_id.into(),
            ..Self::default()
        }
    }

    /// Renames the task.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Set(name.into());
        self
    }

    /// Replaces or clears the content.
    #[must_use]
    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = Patch::Set(content);
        self
    }

    /// Reassigns or unassigns the task.
    #[must_use]
    pub fn with_assignee(mut self, user_id: Option<String>) -> Self {
        self.assignee = Patch::Set(user_id);
        self
    }

    /// Replaces or clears the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Option<String>) -> Self {
        self.priority = Patch::Set(priority);
        self
    }

    /// Replaces or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Patch::Set(due_date);
        self
    }

    /// Replaces the comments.
    #[must_use]
    pub fn with_comments(mut self, comments: impl IntoIterator<Item = String>) -> Self {
        self.comments = Patch::Set(comments.into_iter().collect());
        self
    }

    /// Replaces the attachment references.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = String>) -> Self {
        self.attachments = Patch::Set(attachments.into_iter().collect());
        self
    }
}

/// Request payload for moving a task between columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskRequest {
    /// Raw project identifier.
    pub project_id: String,
    /// Raw task identifier.
    pub task_id: String,
    /// Raw identifier of the column currently holding the task.
    pub source_column_id: String,
    /// Raw identifier of the receiving column.
    pub destination_column_id: String,
}

impl MoveTaskRequest {
    /// Creates the request.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        task_id: impl Into<String>,
        source_column_id: impl Into<String>,
        destination_column_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            task_id: task_id.into(),
            source_column_id: source_column_id.into(),
            destination_column_id: destination_column_id.into(),
        }
    }
}
