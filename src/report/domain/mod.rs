//! Domain model for generated reports.
//!
//! A report is synthesised from a [`ReportContext`] describing the project
//! and persisted as an immutable [`Report`]. Each [`ReportType`] carries a
//! [`ReportProfile`] shared by the external and fallback generation paths.

mod context;
mod error;
mod ids;
mod report;
mod report_type;

pub use context::{ContextFigures, ReportContext, TaskStatistics, completion_percentage};
pub use error::ParseReportTypeError;
pub use ids::ReportId;
pub use report::{NewReport, PersistedReportData, Report};
pub use report_type::{FallbackTemplate, ReportProfile, ReportType, report_title};
