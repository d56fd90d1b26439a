//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{CounterValue, NewTaskRow, TaskRow},
    schema::{project_task_counters, tasks},
};
use crate::project::domain::{ProjectId, ProjectKey, UserId};
use crate::task::{
    domain::{
        PersistedTaskData, Task, TaskDraft, TaskId, TaskKey, TaskPriority, TaskSequence,
        TaskStatus, TaskType,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

const TASK_KEY_CONSTRAINT: &str = "uq_tasks_project_key";

/// Increments the project's counter, seeding it from the current task count
/// on first use, and returns the issued value. The row lock taken by the
/// upsert serializes allocations for one project until commit.
const ALLOCATE_SEQUENCE_SQL: &str = concat!(
    "INSERT INTO project_task_counters (project_id, last_value) ",
    "VALUES ($1, (SELECT COUNT(*) FROM tasks WHERE project_id = $1) + 1) ",
    "ON CONFLICT (project_id) DO UPDATE ",
    "SET last_value = project_task_counters.last_value + 1 ",
    "RETURNING last_value",
);

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn allocate_and_store(
        &self,
        project_key: &ProjectKey,
        draft: TaskDraft,
    ) -> TaskRepositoryResult<Task> {
        let prefix = project_key.clone();

        self.run_blocking(move |connection| {
            // Rolling back on a failed insert also rolls back the counter,
            // so the issued number is not consumed.
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let issued = diesel::sql_query(ALLOCATE_SEQUENCE_SQL)
                    .bind::<diesel::sql_types::Uuid, _>(draft.project_id().into_inner())
                    .get_result::<CounterValue>(tx)?;
                let raw = u64::try_from(issued.last_value)
                    .map_err(TaskRepositoryError::persistence)?;
                let sequence = TaskSequence::new(raw)?;

                let task_id = draft.id();
                let key = TaskKey::allocate(&prefix, sequence);
                let task = draft.into_task(key.clone());
                let row = to_new_row(&task)?;

                diesel::insert_into(tasks::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_task_key_violation(info.as_ref()) =>
                        {
                            TaskRepositoryError::DuplicateTaskKey(key.clone())
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;

                debug!(task_key = %task.key(), "inserted task under allocated key");
                Ok(task)
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(row.id))
                .set((
                    tasks::title.eq(&row.title),
                    tasks::description.eq(&row.description),
                    tasks::status.eq(&row.status),
                    tasks::priority.eq(&row.priority),
                    tasks::task_type.eq(&row.task_type),
                    tasks::assignee_id.eq(row.assignee_id),
                    tasks::updated_at.eq(row.updated_at),
                ))
                .execute(connection)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .order((tasks::created_at.desc(), tasks::sequence_number.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn find_by_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::assignee_id.eq(assignee.into_inner()))
                .order((tasks::created_at.desc(), tasks::sequence_number.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn count_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .count()
                .get_result::<i64>(connection)?;
            u64::try_from(count).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64> {
        let owner = project_id.into_inner();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let removed = diesel::delete(tasks::table.filter(tasks::project_id.eq(owner)))
                    .execute(tx)?;
                diesel::delete(
                    project_task_counters::table
                        .filter(project_task_counters::project_id.eq(owner)),
                )
                .execute(tx)?;
                u64::try_from(removed).map_err(TaskRepositoryError::persistence)
            })
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let sequence_number =
        i64::try_from(task.key().sequence().value()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        task_key: task.key().to_string(),
        sequence_number,
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        task_type: task.task_type().as_str().to_owned(),
        reporter_id: task.reporter().into_inner(),
        assignee_id: task.assignee().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        task_key,
        title,
        description,
        status: persisted_status,
        priority: persisted_priority,
        task_type: persisted_type,
        reporter_id,
        assignee_id,
        created_at,
        updated_at,
        ..
    } = row;

    let key = TaskKey::parse(&task_key).map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let task_type =
        TaskType::try_from(persisted_type.as_str()).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        key,
        project_id: ProjectId::from_uuid(project_id),
        title,
        description,
        status,
        priority,
        task_type,
        reporter: UserId::from_uuid(reporter_id),
        assignee: assignee_id.map(UserId::from_uuid),
        created_at,
        updated_at,
    }))
}

fn is_task_key_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == TASK_KEY_CONSTRAINT)
}
