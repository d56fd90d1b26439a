//! In-memory repository for tasks and per-project key counters.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::domain::{ProjectId, ProjectKey, UserId};
use crate::task::{
    domain::{Task, TaskDraft, TaskId, TaskKey, TaskSequence},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Key allocation runs under the state's write lock, which makes the
/// counter increment and the insert a single critical section.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    key_index: HashMap<(ProjectId, TaskKey), TaskId>,
    counters: HashMap<ProjectId, TaskSequence>,
}

impl InMemoryTaskState {
    fn project_task_count(&self, project_id: ProjectId) -> usize {
        self.tasks
            .values()
            .filter(|task| task.project_id() == project_id)
            .count()
    }

    fn next_sequence(&self, project_id: ProjectId) -> TaskRepositoryResult<TaskSequence> {
        let sequence = match self.counters.get(&project_id) {
            Some(last) => last.next()?,
            None => {
                let count = u64::try_from(self.project_task_count(project_id))
                    .map_err(TaskRepositoryError::persistence)?;
                TaskSequence::after_count(count)?
            }
        };
        Ok(sequence)
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects matching tasks ordered newest first.
fn newest_first<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<Task> {
    let mut found: Vec<Task> = tasks.cloned().collect();
    found.sort_by_key(|task| Reverse((task.created_at(), task.key().sequence())));
    found
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn allocate_and_store(
        &self,
        project_key: &ProjectKey,
        draft: TaskDraft,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&draft.id()) {
            return Err(TaskRepositoryError::DuplicateTask(draft.id()));
        }

        let project_id = draft.project_id();
        let sequence = state.next_sequence(project_id)?;
        let key = TaskKey::allocate(project_key, sequence);
        let index_key = (project_id, key.clone());
        if state.key_index.contains_key(&index_key) {
            return Err(TaskRepositoryError::DuplicateTaskKey(key));
        }

        let task = draft.into_task(key);
        state.key_index.insert(index_key, task.id());
        state.tasks.insert(task.id(), task.clone());
        state.counters.insert(project_id, sequence);
        Ok(task)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        state
            .key_index
            .remove(&(removed.project_id(), removed.key().clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(newest_first(
            state
                .tasks
                .values()
                .filter(|task| task.project_id() == project_id),
        ))
    }

    async fn find_by_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(newest_first(
            state
                .tasks
                .values()
                .filter(|task| task.assignee() == Some(assignee)),
        ))
    }

    async fn count_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        u64::try_from(state.project_task_count(project_id))
            .map_err(TaskRepositoryError::persistence)
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64> {
        let mut state = self.state.write().map_err(lock_error)?;
        let before = state.tasks.len();
        state.tasks.retain(|_, task| task.project_id() != project_id);
        state.key_index.retain(|(owner, _), _| *owner != project_id);
        state.counters.remove(&project_id);
        let removed = before.saturating_sub(state.tasks.len());
        u64::try_from(removed).map_err(TaskRepositoryError::persistence)
    }
}
