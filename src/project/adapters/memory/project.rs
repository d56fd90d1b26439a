//! In-memory repository for projects.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Project, ProjectDomainError, ProjectId, ProjectKey, UserId},
    ports::{ProjectMutation, ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, Project>,
    key_index: HashMap<ProjectKey, ProjectId>,
}

impl InMemoryProjectState {
    /// Overwrites a stored project, moving its key index entry when the key
    /// changed.
    fn replace(&mut self, project: &Project) -> ProjectRepositoryResult<()> {
        let old_key = self
            .projects
            .get(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?
            .key()
            .clone();

        if old_key != *project.key() {
            if self.key_index.contains_key(project.key()) {
                return Err(ProjectRepositoryError::DuplicateProjectKey(
                    project.key().clone(),
                ));
            }
            self.key_index.remove(&old_key);
            self.key_index.insert(project.key().clone(), project.id());
        }

        self.projects.insert(project.id(), project.clone());
        Ok(())
    }
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        if state.key_index.contains_key(project.key()) {
            return Err(ProjectRepositoryError::DuplicateProjectKey(
                project.key().clone(),
            ));
        }

        state.key_index.insert(project.key().clone(), project.id());
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.replace(project)
    }

    async fn modify<T, F>(
        &self,
        id: ProjectId,
        mutate: F,
    ) -> ProjectRepositoryResult<ProjectMutation<T>>
    where
        F: FnOnce(&mut Project) -> Result<T, ProjectDomainError> + Send + 'static,
        T: Send + 'static,
    {
        // The write guard spans read, mutation and write-back.
        let mut state = self.state.write().map_err(lock_error)?;
        let mut project = state
            .projects
            .get(&id)
            .cloned()
            .ok_or(ProjectRepositoryError::NotFound(id))?;

        let outcome = match mutate(&mut project) {
            Ok(outcome) => outcome,
            Err(rejection) => return Ok(Err(rejection)),
        };
        state.replace(&project)?;
        Ok(Ok((project, outcome)))
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .projects
            .remove(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        state.key_index.remove(removed.key());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn exists_by_key(&self, key: &ProjectKey) -> ProjectRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.key_index.contains_key(key))
    }

    async fn find_for_user(&self, user: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|project| project.is_associated(user))
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(projects)
    }
}
