//! In-memory repository for workspace aggregates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::shared::{Revision, UserId, WorkspaceId};
use crate::workspace::{
    domain::Workspace,
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};

/// Thread-safe in-memory workspace repository with revision checks and a
/// unique name index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceRepository {
    state: Arc<RwLock<InMemoryWorkspaceState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkspaceState {
    workspaces: HashMap<WorkspaceId, Workspace>,
    name_index: HashMap<String, WorkspaceId>,
    insertion_order: Vec<WorkspaceId>,
}

impl InMemoryWorkspaceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: &impl ToString) -> WorkspaceRepositoryError {
    WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaceRepository {
    async fn store(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_poisoned(&err))?;
        if state.workspaces.contains_key(&workspace.id()) {
            return Err(WorkspaceRepositoryError::DuplicateWorkspace(workspace.id()));
        }
        if state.name_index.contains_key(workspace.name()) {
            return Err(WorkspaceRepositoryError::DuplicateName(
                workspace.name().to_owned(),
            ));
        }

        state
            .name_index
            .insert(workspace.name().to_owned(), workspace.id());
        state.insertion_order.push(workspace.id());
        state.workspaces.insert(workspace.id(), workspace.clone());
        Ok(())
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<Revision> {
        let mut state = self.state.write().map_err(|err| lock_poisoned(&err))?;
        let stored = state
            .workspaces
            .get(&workspace.id())
            .ok_or(WorkspaceRepositoryError::NotFound(workspace.id()))?;

        if stored.revision() != workspace.revision() {
            return Err(WorkspaceRepositoryError::RevisionConflict {
                id: workspace.id(),
                expected: workspace.revision(),
                actual: stored.revision(),
            });
        }

        let previous_name = stored.name().to_owned();
        if previous_name != workspace.name() {
            if state.name_index.contains_key(workspace.name()) {
                return Err(WorkspaceRepositoryError::DuplicateName(
                    workspace.name().to_owned(),
                ));
            }
            state.name_index.remove(&previous_name);
            state
                .name_index
                .insert(workspace.name().to_owned(), workspace.id());
        }

        let next_revision = workspace.revision().next();
        let mut saved = workspace.clone();
        saved.record_revision(next_revision);
        state.workspaces.insert(workspace.id(), saved);
        Ok(next_revision)
    }

    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let state = self.state.read().map_err(|err| lock_poisoned(&err))?;
        Ok(state.workspaces.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let state = self.state.read().map_err(|err| lock_poisoned(&err))?;
        Ok(state
            .name_index
            .get(name)
            .and_then(|id| state.workspaces.get(id))
            .cloned())
    }

    async fn find_by_member(&self, user_id: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        let state = self.state.read().map_err(|err| lock_poisoned(&err))?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.workspaces.get(id))
            .filter(|workspace| {
                workspace
                    .members()
                    .iter()
                    .any(|member| member.user_id() == user_id && member.is_active())
            })
            .cloned()
            .collect())
    }
}
