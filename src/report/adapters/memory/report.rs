//! In-memory repository for reports.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::domain::{ProjectId, UserId};
use crate::report::{
    domain::{Report, ReportId, ReportType},
    ports::{ReportRepository, ReportRepositoryError, ReportRepositoryResult},
};

/// Thread-safe in-memory report repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportRepository {
    state: Arc<RwLock<HashMap<ReportId, Report>>>,
}

impl InMemoryReportRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, predicate: impl Fn(&Report) -> bool) -> ReportRepositoryResult<Vec<Report>> {
        let reports = self.state.read().map_err(lock_error)?;
        let mut found: Vec<Report> = reports
            .values()
            .filter(|report| predicate(report))
            .cloned()
            .collect();
        found.sort_by_key(|report| Reverse(report.created_at()));
        Ok(found)
    }
}

fn lock_error(err: impl ToString) -> ReportRepositoryError {
    ReportRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn store(&self, report: &Report) -> ReportRepositoryResult<()> {
        let mut reports = self.state.write().map_err(lock_error)?;
        if reports.contains_key(&report.id()) {
            return Err(ReportRepositoryError::DuplicateReport(report.id()));
        }
        reports.insert(report.id(), report.clone());
        Ok(())
    }

    async fn delete(&self, id: ReportId) -> ReportRepositoryResult<()> {
        let mut reports = self.state.write().map_err(lock_error)?;
        reports
            .remove(&id)
            .map(|_| ())
            .ok_or(ReportRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: ReportId) -> ReportRepositoryResult<Option<Report>> {
        let reports = self.state.read().map_err(lock_error)?;
        Ok(reports.get(&id).cloned())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> ReportRepositoryResult<Vec<Report>> {
        self.select(|report| report.project_id() == project_id)
    }

    async fn find_by_author(&self, author_id: UserId) -> ReportRepositoryResult<Vec<Report>> {
        self.select(|report| report.author_id() == author_id)
    }

    async fn find_by_project_and_type(
        &self,
        project_id: ProjectId,
        report_type: ReportType,
    ) -> ReportRepositoryResult<Vec<Report>> {
        self.select(|report| {
            report.project_id() == project_id && report.report_type() == report_type
        })
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> ReportRepositoryResult<u64> {
        let mut reports = self.state.write().map_err(lock_error)?;
        let before = reports.len();
        reports.retain(|_, report| report.project_id() != project_id);
        u64::try_from(before.saturating_sub(reports.len()))
            .map_err(ReportRepositoryError::persistence)
    }
}
