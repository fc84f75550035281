//! In-memory repository for project aggregates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::Project,
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::shared::{ProjectId, Revision, WorkspaceId};

/// Thread-safe in-memory project repository with revision checks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, Project>,
    insertion_order: Vec<ProjectId>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: &impl ToString) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_poisoned(&err))?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.insertion_order.push(project.id());
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<Revision> {
        let mut state = self.state.write().map_err(|err| lock_poisoned(&err))?;
        let stored = state
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;

        if stored.revision() != project.revision() {
            return Err(ProjectRepositoryError::RevisionConflict {
                id: project.id(),
                expected: project.revision(),
                actual: stored.revision(),
            });
        }

        let next_revision = project.revision().next();
        let mut saved = project.clone();
        saved.record_revision(next_revision);
        *stored = saved;
        Ok(next_revision)
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(|err| lock_poisoned(&err))?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn find_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(|err| lock_poisoned(&err))?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.projects.get(id))
            .filter(|project| project.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }
}
