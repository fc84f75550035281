//! Project aggregate root.

use super::{Board, BoardDomainError};
use crate::shared::{Patch, ProjectId, Revision, UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated fields for a project that is about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    workspace_id: WorkspaceId,
    created_by: UserId,
}

impl ProjectDraft {
    /// Creates a draft with the required project fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyProjectName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        workspace_id: WorkspaceId,
        created_by: UserId,
    ) -> Result<Self, BoardDomainError> {
        Ok(Self {
            name: normalize_name(name.into())?,
            description: None,
            image_url: None,
            workspace_id,
            created_by,
        })
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
}

/// Partial update of project metadata. The workspace reference is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    /// New project name.
    pub name: Patch<String>,
    /// New description, or `Set(None)` to clear it.
    pub description: Patch<Option<String>>,
    /// New image reference, or `Set(None)` to clear it.
    pub image_url: Patch<Option<String>>,
}

/// Project aggregate owning a kanban board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    workspace_id: WorkspaceId,
    created_by: UserId,
    board: Board,
    is_active: bool,
    deactivated_at: Option<DateTime<Utc>>,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates an active project with the given board.
    #[must_use]
    pub fn new(draft: ProjectDraft, board: Board, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let ProjectDraft {
            name,
            description,
            image_url,
            workspace_id,
            created_by,
        } = draft;

        Self {
            id: ProjectId::new(),
            name,
            description,
            image_url,
            workspace_id,
            created_by,
            board,
            is_active: true,
            deactivated_at: None,
            revision: Revision::initial(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the image reference.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the embedded board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns whether the project is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the project was deactivated.
    #[must_use]
    pub const fn deactivated_at(&self) -> Option<DateTime<Utc>> {
        self.deactivated_at
    }

    /// Returns the revision this aggregate was loaded or saved with.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
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

    /// Fails when the project has been deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ProjectInactive`].
    pub const fn ensure_active(&self) -> Result<(), BoardDomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(BoardDomainError::ProjectInactive(self.id))
        }
    }

    /// Runs a board mutation and touches the modification timestamp when it
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ProjectInactive`] for a deactivated
    /// project, or the error produced by `mutation`. A failed mutation must
    /// leave the board unchanged; every [`Board`] operation validates before
    /// writing.
    pub fn edit_board<T>(
        &mut self,
        clock: &impl Clock,
        mutation: impl FnOnce(&mut Board) -> Result<T, BoardDomainError>,
    ) -> Result<T, BoardDomainError> {
        self.ensure_active()?;
        let outcome = mutation(&mut self.board)?;
        self.updated_at = clock.utc();
        Ok(outcome)
    }

    /// Applies a partial metadata update.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ProjectInactive`] or
    /// [`BoardDomainError::EmptyProjectName`].
    pub fn apply_patch(
        &mut self,
        patch: ProjectPatch,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.ensure_active()?;
        let ProjectPatch {
            name,
            description,
            image_url,
        } = patch;
        let validated_name = name.try_map(normalize_name)?;

        let mut changed = validated_name.apply_to(&mut self.name);
        changed |= description.apply_to(&mut self.description);
        changed |= image_url.apply_to(&mut self.image_url);
        if changed {
            self.updated_at = clock.utc();
        }
        Ok(())
    }

    /// Soft-deletes the project.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ProjectInactive`] when already deactivated.
    pub fn deactivate(&mut self, clock: &impl Clock) -> Result<(), BoardDomainError> {
        self.ensure_active()?;
        let timestamp = clock.utc();
        self.is_active = false;
        self.deactivated_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Records the revision assigned by the repository after a save.
    pub const fn record_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
}

fn normalize_name(name: String) -> Result<String, BoardDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyProjectName);
    }
    Ok(trimmed.to_owned())
}
