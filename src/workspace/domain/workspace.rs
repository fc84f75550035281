//! Workspace aggregate root and membership types.

use super::{ParseMemberRoleError, WorkspaceDomainError};
use crate::shared::{Patch, ProjectId, Revision, UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Role of a workspace member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    /// May administer the workspace.
    Admin,
    /// Regular member.
    #[default]
    Member,
}

impl MemberRole {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Member => "Member",
        }
    }
}

impl TryFrom<&str> for MemberRole {
    type Error = ParseMemberRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseMemberRoleError(value.to_owned())),
        }
    }
}

/// Membership entry of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    user_id: UserId,
    role: MemberRole,
    is_active: bool,
    joined_at: DateTime<Utc>,
}

impl Member {
    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the member's role.
    #[must_use]
    pub const fn role(&self) -> MemberRole {
        self.role
    }

    /// Returns whether the membership is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the user (last) joined.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

/// Validated fields for a workspace that is about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceDraft {
    name: String,
    description: Option<String>,
    image_url: Option<String>,
}

impl WorkspaceDraft {
    /// Creates a draft with the required name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyWorkspaceName`] when the name is
    /// blank.
    pub fn new(name: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        Ok(Self {
            name: normalize_name(name.into())?,
            description: None,
            image_url: None,
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

/// Partial update of workspace metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspacePatch {
    /// New workspace name.
    pub name: Patch<String>,
    /// New description, or `Set(None)` to clear it.
    pub description: Patch<Option<String>>,
    /// New image reference, or `Set(None)` to clear it.
    pub image_url: Patch<Option<String>>,
}

/// Workspace aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    projects: Vec<ProjectId>,
    members: Vec<Member>,
    is_active: bool,
    deactivated_at: Option<DateTime<Utc>>,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates an active workspace whose first member is `creator` as
    /// [`MemberRole::Admin`].
    #[must_use]
    pub fn new(draft: WorkspaceDraft, creator: UserId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let WorkspaceDraft {
            name,
            description,
            image_url,
        } = draft;

        Self {
            id: WorkspaceId::new(),
            name,
            description,
            image_url,
            projects: Vec::new(),
            members: vec![Member {
                user_id: creator,
                role: MemberRole::Admin,
                is_active: true,
                joined_at: timestamp,
            }],
            is_active: true,
            deactivated_at: None,
            revision: Revision::initial(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
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

    /// Returns the projects registered with this workspace.
    #[must_use]
    pub fn projects(&self) -> &[ProjectId] {
        &self.projects
    }

    /// Returns every membership entry, active or not.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns whether the workspace is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the workspace was deactivated.
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

    /// Returns the role of an active member of an active workspace.
    #[must_use]
    pub fn active_role(&self, user_id: UserId) -> Option<MemberRole> {
        if !self.is_active {
            return None;
        }
        self.members
            .iter()
            .find(|member| member.user_id == user_id && member.is_active)
            .map(Member::role)
    }

    /// Fails when the workspace has been deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::WorkspaceInactive`].
    pub const fn ensure_active(&self) -> Result<(), WorkspaceDomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(WorkspaceDomainError::WorkspaceInactive(self.id))
        }
    }

    /// Fails unless the user is an active `Admin`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::NotAnAdmin`].
    pub fn ensure_admin(&self, user_id: UserId) -> Result<(), WorkspaceDomainError> {
        match self.active_role(user_id) {
            Some(MemberRole::Admin) => Ok(()),
            _ => Err(WorkspaceDomainError::NotAnAdmin(user_id)),
        }
    }

    /// Adds a member, or reactivates a former member with the given role.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::MemberAlreadyActive`] when the user is
    /// already an active member, or
    /// [`WorkspaceDomainError::WorkspaceInactive`].
    pub fn add_member(
        &mut self,
        user_id: UserId,
        role: MemberRole,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        self.ensure_active()?;
        let timestamp = clock.utc();

        match self
            .members
            .iter_mut()
            .find(|member| member.user_id == user_id)
        {
            Some(member) if member.is_active => {
                return Err(WorkspaceDomainError::MemberAlreadyActive(user_id));
            }
            Some(member) => {
                member.role = role;
                member.is_active = true;
                member.joined_at = timestamp;
            }
            None => self.members.push(Member {
                user_id,
                role,
                is_active: true,
                joined_at: timestamp,
            }),
        }

        self.updated_at = timestamp;
        Ok(())
    }

    /// Marks an active member as inactive.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::MemberNotFound`] when the user is not
    /// an active member, or [`WorkspaceDomainError::WorkspaceInactive`].
    pub fn deactivate_member(
        &mut self,
        user_id: UserId,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        self.ensure_active()?;
        let member = self
            .members
            .iter_mut()
            .find(|member| member.user_id == user_id && member.is_active)
            .ok_or(WorkspaceDomainError::MemberNotFound(user_id))?;
        member.is_active = false;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Registers a project reference. Returns `false` when it was already
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::WorkspaceInactive`].
    pub fn link_project(
        &mut self,
        project_id: ProjectId,
        clock: &impl Clock,
    ) -> Result<bool, WorkspaceDomainError> {
        self.ensure_active()?;
        if self.projects.contains(&project_id) {
            return Ok(false);
        }
        self.projects.push(project_id);
        self.updated_at = clock.utc();
        Ok(true)
    }

    /// Applies a partial metadata update.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyWorkspaceName`] or
    /// [`WorkspaceDomainError::WorkspaceInactive`].
    pub fn apply_patch(
        &mut self,
        patch: WorkspacePatch,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        self.ensure_active()?;
        let WorkspacePatch {
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

    /// Soft-deletes the workspace on behalf of an admin.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::WorkspaceInactive`] or
    /// [`WorkspaceDomainError::NotAnAdmin`].
    pub fn deactivate(
        &mut self,
        acting_user: UserId,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        self.ensure_active()?;
        self.ensure_admin(acting_user)?;
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

fn normalize_name(name: String) -> Result<String, WorkspaceDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceDomainError::EmptyWorkspaceName);
    }
    Ok(trimmed.to_owned())
}
