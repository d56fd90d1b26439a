//! `PostgreSQL` repository implementation for project storage.

use super::{
    models::{NewProjectRow, ProjectMemberRow, ProjectRow},
    schema::{project_members, projects},
};
use crate::project::{
    domain::{PersistedProjectData, Project, ProjectDomainError, ProjectId, ProjectKey, UserId},
    ports::{ProjectMutation, ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeSet, HashMap};

/// `PostgreSQL` connection pool type shared by the engine's adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

const PROJECT_KEY_CONSTRAINT: &str = "uq_projects_key";

/// `PostgreSQL`-backed project repository.
///
/// The project row and its membership rows are written in one transaction.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let key = project.key().clone();
        let row = to_new_row(project);
        let members = member_rows(project);

        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                diesel::insert_into(projects::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| map_write_error(err, project_id, &key))?;
                diesel::insert_into(project_members::table)
                    .values(&members)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let snapshot = project.clone();
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, ProjectRepositoryError, _>(|tx| write_project(tx, &snapshot))
        })
        .await
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
        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                // The row lock holds off other writers of this project until
                // commit.
                let row = projects::table
                    .find(id.into_inner())
                    .select(ProjectRow::as_select())
                    .for_update()
                    .first::<ProjectRow>(tx)
                    .optional()?
                    .ok_or(ProjectRepositoryError::NotFound(id))?;
                let mut project = hydrate(tx, vec![row])?
                    .pop()
                    .ok_or(ProjectRepositoryError::NotFound(id))?;

                let outcome = match mutate(&mut project) {
                    Ok(outcome) => outcome,
                    Err(rejection) => return Ok(Err(rejection)),
                };
                write_project(tx, &project)?;
                Ok(Ok((project, outcome)))
            })
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(projects::table.find(id.into_inner()))
                .execute(connection)?;
            if deleted == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            let Some(found) = row else {
                return Ok(None);
            };
            let mut projects = hydrate(connection, vec![found])?;
            Ok(projects.pop())
        })
        .await
    }

    async fn exists_by_key(&self, key: &ProjectKey) -> ProjectRepositoryResult<bool> {
        let lookup = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            let exists = diesel::select(diesel::dsl::exists(
                projects::table.filter(projects::project_key.eq(lookup)),
            ))
            .get_result::<bool>(connection)?;
            Ok(exists)
        })
        .await
    }

    async fn find_for_user(&self, user: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let user_uuid = user.into_inner();
        self.run_blocking(move |connection| {
            let member_of = project_members::table
                .filter(project_members::user_id.eq(user_uuid))
                .select(project_members::project_id);
            let rows = projects::table
                .filter(
                    projects::lead_id
                        .eq(user_uuid)
                        .or(projects::id.eq_any(member_of)),
                )
                .order(projects::project_key.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            hydrate(connection, rows)
        })
        .await
    }
}

/// Rewrites the project row and replaces its membership rows.
fn write_project(connection: &mut PgConnection, project: &Project) -> ProjectRepositoryResult<()> {
    let project_id = project.id();
    let row = to_new_row(project);
    let members = member_rows(project);

    let updated = diesel::update(projects::table.find(row.id))
        .set((
            projects::project_key.eq(&row.project_key),
            projects::name.eq(&row.name),
            projects::description.eq(&row.description),
            projects::lead_id.eq(row.lead_id),
            projects::updated_at.eq(row.updated_at),
        ))
        .execute(connection)
        .map_err(|err| map_write_error(err, project_id, project.key()))?;
    if updated == 0 {
        return Err(ProjectRepositoryError::NotFound(project_id));
    }

    diesel::delete(project_members::table.filter(project_members::project_id.eq(row.id)))
        .execute(connection)?;
    diesel::insert_into(project_members::table)
        .values(&members)
        .execute(connection)?;
    Ok(())
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        project_key: project.key().as_str().to_owned(),
        name: project.name().to_owned(),
        description: project.description().map(str::to_owned),
        lead_id: project.lead().map(UserId::into_inner),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn member_rows(project: &Project) -> Vec<ProjectMemberRow> {
    project
        .members()
        .iter()
        .map(|member| ProjectMemberRow {
            project_id: project.id().into_inner(),
            user_id: member.into_inner(),
        })
        .collect()
}

/// Loads members for the given rows and rebuilds the aggregates, keeping
/// row order.
fn hydrate(
    connection: &mut PgConnection,
    rows: Vec<ProjectRow>,
) -> ProjectRepositoryResult<Vec<Project>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
    let member_rows = project_members::table
        .filter(project_members::project_id.eq_any(&ids))
        .select(ProjectMemberRow::as_select())
        .load::<ProjectMemberRow>(connection)?;

    let mut members_by_project: HashMap<uuid::Uuid, BTreeSet<UserId>> = HashMap::new();
    for member in member_rows {
        members_by_project
            .entry(member.project_id)
            .or_default()
            .insert(UserId::from_uuid(member.user_id));
    }

    rows.into_iter()
        .map(|row| {
            let members = members_by_project.remove(&row.id).unwrap_or_default();
            row_to_project(row, members)
        })
        .collect()
}

fn row_to_project(row: ProjectRow, members: BTreeSet<UserId>) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        project_key,
        name,
        description,
        lead_id,
        created_at,
        updated_at,
    } = row;
    let key = ProjectKey::new(project_key).map_err(ProjectRepositoryError::persistence)?;

    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        key,
        name,
        description,
        lead: lead_id.map(UserId::from_uuid),
        members,
        created_at,
        updated_at,
    }))
}

fn map_write_error(err: DieselError, id: ProjectId, key: &ProjectKey) -> ProjectRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_key_violation(info.as_ref()) =>
        {
            ProjectRepositoryError::DuplicateProjectKey(key.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ProjectRepositoryError::DuplicateProject(id)
        }
        other => ProjectRepositoryError::persistence(other),
    }
}

fn is_key_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == PROJECT_KEY_CONSTRAINT)
}
