//! `PostgreSQL` repository implementation for report storage.

use super::{models::ReportRow, schema::reports};
use crate::project::domain::{ProjectId, UserId};
use crate::report::{
    domain::{PersistedReportData, Report, ReportId, ReportType},
    ports::{ReportRepository, ReportRepositoryError, ReportRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by report adapters.
pub type ReportPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed report repository.
#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pool: ReportPgPool,
}

impl PostgresReportRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReportPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReportRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReportRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReportRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReportRepositoryError::persistence)?
    }

    async fn load_where<F>(&self, filter: F) -> ReportRepositoryResult<Vec<Report>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<ReportRow>> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            filter(connection)?.into_iter().map(row_to_report).collect()
        })
        .await
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn store(&self, report: &Report) -> ReportRepositoryResult<()> {
        let report_id = report.id();
        let row = to_row(report);

        self.run_blocking(move |connection| {
            diesel::insert_into(reports::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReportRepositoryError::DuplicateReport(report_id)
                    }
                    _ => ReportRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ReportId) -> ReportRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(reports::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(ReportRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ReportId) -> ReportRepositoryResult<Option<Report>> {
        self.run_blocking(move |connection| {
            let row = reports::table
                .find(id.into_inner())
                .select(ReportRow::as_select())
                .first::<ReportRow>(connection)
                .optional()?;
            row.map(row_to_report).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> ReportRepositoryResult<Vec<Report>> {
        let owner = project_id.into_inner();
        self.load_where(move |connection| {
            reports::table
                .filter(reports::project_id.eq(owner))
                .order(reports::created_at.desc())
                .select(ReportRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_by_author(&self, author_id: UserId) -> ReportRepositoryResult<Vec<Report>> {
        let author = author_id.into_inner();
        self.load_where(move |connection| {
            reports::table
                .filter(reports::author_id.eq(author))
                .order(reports::created_at.desc())
                .select(ReportRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_by_project_and_type(
        &self,
        project_id: ProjectId,
        report_type: ReportType,
    ) -> ReportRepositoryResult<Vec<Report>> {
        let owner = project_id.into_inner();
        self.load_where(move |connection| {
            reports::table
                .filter(reports::project_id.eq(owner))
                .filter(reports::report_type.eq(report_type.as_str()))
                .order(reports::created_at.desc())
                .select(ReportRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> ReportRepositoryResult<u64> {
        let owner = project_id.into_inner();
        self.run_blocking(move |connection| {
            let removed = diesel::delete(reports::table.filter(reports::project_id.eq(owner)))
                .execute(connection)?;
            u64::try_from(removed).map_err(ReportRepositoryError::persistence)
        })
        .await
    }
}

fn to_row(report: &Report) -> ReportRow {
    ReportRow {
        id: report.id().into_inner(),
        project_id: report.project_id().into_inner(),
        author_id: report.author_id().into_inner(),
        title: report.title().to_owned(),
        report_type: report.report_type().as_str().to_owned(),
        prompt: report.prompt().to_owned(),
        content: report.content().to_owned(),
        created_at: report.created_at(),
        updated_at: report.updated_at(),
    }
}

fn row_to_report(row: ReportRow) -> ReportRepositoryResult<Report> {
    let report_type =
        ReportType::try_from(row.report_type.as_str()).map_err(ReportRepositoryError::persistence)?;

    Ok(Report::from_persisted(PersistedReportData {
        id: ReportId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        author_id: UserId::from_uuid(row.author_id),
        title: row.title,
        report_type,
        prompt: row.prompt,
        content: row.content,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
